//! Command-line interface for cdatypes

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use cdatypes::datatypes::{
    Ad, Bl, Cd, Ce, Cs, Cv, Ed, EivlTs, En, Ii, Int, IvlPq, IvlTs, Mo, On, PivlTs, Pn, Pq, Real,
    Rto, Sc, St, Tel, Tn, Ts,
};
#[cfg(feature = "cli")]
use cdatypes::json::element_to_json;
#[cfg(feature = "cli")]
use cdatypes::narrative::Text;
#[cfg(feature = "cli")]
use cdatypes::validate::Validate;
#[cfg(feature = "cli")]
use cdatypes::vocab::{
    ActClass, ActMood, ActRelationshipType, AddressPartType, AdministrativeGender,
    BinaryDataEncoding, CalendarCycle, CompressionAlgorithm, EntityClass, EntityDeterminer,
    EntityNamePartQualifier, EntityNamePartType, EntityNameUse, IntegrityCheckAlgorithm,
    NullFlavor, ParticipationType, PostalAddressUse, RoleClass, SetOperator,
    TelecommunicationAddressUse, TimingEvent,
};
#[cfg(feature = "cli")]
use cdatypes::xml::{Document, Element, FromXml};

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "cdatypes")]
#[command(author, version, about = "CDA datatype and narrative validation tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate an XML fragment as a narrative block or datatype
    Validate {
        /// Path to the XML file to validate
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// The type to decode the fragment as (e.g. text, II, CD, IVL_TS)
        #[arg(short = 'a', long = "as", default_value = "text")]
        type_name: String,
    },

    /// Convert an XML fragment to JSON
    #[command(name = "xml2json")]
    XmlToJson {
        /// Path to the XML file to convert
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Pretty print the output
        #[arg(short, long)]
        pretty: bool,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Inspect a vocabulary code system
    Vocab {
        /// Code system name (e.g. NullFlavor, ActClass)
        #[arg(value_name = "SYSTEM")]
        system: String,

        /// Look up a single code
        #[arg(short, long)]
        code: Option<String>,
    },
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { file, type_name } => cmd_validate(file, type_name),
        Commands::XmlToJson {
            file,
            pretty,
            output,
        } => cmd_xml2json(file, pretty, output),
        Commands::Vocab { system, code } => cmd_vocab(system, code),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn check<T: FromXml + Validate>(
    el: &Element,
) -> Result<Vec<cdatypes::error::ValidationError>, Box<dyn std::error::Error>> {
    let value = T::from_xml(el)?;
    Ok(value.validate().err().unwrap_or_default())
}

#[cfg(feature = "cli")]
fn cmd_validate(file: PathBuf, type_name: String) -> Result<(), Box<dyn std::error::Error>> {
    let xml = fs::read(&file)?;
    let doc = Document::parse(&xml, &cdatypes::limits::Limits::default())?;
    let root = doc
        .root()
        .ok_or_else(|| cdatypes::Error::Xml("Document has no root element".to_string()))?;

    let errors = match type_name.to_uppercase().as_str() {
        "TEXT" => check::<Text>(root)?,
        "BL" => check::<Bl>(root)?,
        "II" => check::<Ii>(root)?,
        "CS" => check::<Cs>(root)?,
        "CD" => check::<Cd>(root)?,
        "CE" => check::<Ce>(root)?,
        "CV" => check::<Cv>(root)?,
        "ED" => check::<Ed>(root)?,
        "ST" => check::<St>(root)?,
        "SC" => check::<Sc>(root)?,
        "TEL" => check::<Tel>(root)?,
        "AD" => check::<Ad>(root)?,
        "EN" => check::<En>(root)?,
        "PN" => check::<Pn>(root)?,
        "ON" => check::<On>(root)?,
        "TN" => check::<Tn>(root)?,
        "INT" => check::<Int>(root)?,
        "REAL" => check::<Real>(root)?,
        "PQ" => check::<Pq>(root)?,
        "MO" => check::<Mo>(root)?,
        "RTO" => check::<Rto>(root)?,
        "TS" => check::<Ts>(root)?,
        "IVL_TS" => check::<IvlTs>(root)?,
        "IVL_PQ" => check::<IvlPq>(root)?,
        "PIVL_TS" => check::<PivlTs>(root)?,
        "EIVL_TS" => check::<EivlTs>(root)?,
        other => return Err(format!("Unknown type: {}", other).into()),
    };

    if errors.is_empty() {
        println!("✓ {} is valid as {}", file.display(), type_name);
        Ok(())
    } else {
        println!("✗ {} is invalid as {}", file.display(), type_name);
        println!();
        println!("Errors:");
        for error in &errors {
            println!("  - {}", error);
        }
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn cmd_xml2json(
    file: PathBuf,
    pretty: bool,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let xml = fs::read(&file)?;
    let doc = Document::parse(&xml, &cdatypes::limits::Limits::default())?;
    let root = doc
        .root()
        .ok_or_else(|| cdatypes::Error::Xml("Document has no root element".to_string()))?;

    let mut wrapper = serde_json::Map::new();
    wrapper.insert(root.local_name().to_string(), element_to_json(root));
    let value = serde_json::Value::Object(wrapper);

    let rendered = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };

    match output {
        Some(path) => fs::write(path, rendered)?,
        None => println!("{}", rendered),
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn list_system(
    name: &str,
    oid: Option<&str>,
    codes: &[(&'static str, String)],
    lookup: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    match lookup {
        None => {
            match oid {
                Some(oid) => println!("{} ({})", name, oid),
                None => println!("{}", name),
            }
            for (code, _) in codes {
                println!("  {}", code);
            }
            Ok(())
        }
        Some(code) => match codes.iter().find(|(c, _)| *c == code) {
            Some((code, detail)) => {
                println!("{}", code);
                if let Some(oid) = oid {
                    println!("  codeSystem: {}", oid);
                }
                if !detail.is_empty() {
                    println!("  {}", detail);
                }
                Ok(())
            }
            None => Err(format!("'{}' is not a {} code", code, name).into()),
        },
    }
}

#[cfg(feature = "cli")]
fn cmd_vocab(system: String, code: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    macro_rules! plain {
        ($ty:ty) => {
            list_system(
                &system,
                cdatypes::vocab::code_system_oid(&system),
                &<$ty>::ALL
                    .iter()
                    .map(|v| (v.as_str(), String::new()))
                    .collect::<Vec<_>>(),
                code.as_deref(),
            )
        };
    }

    match system.as_str() {
        "NullFlavor" => {
            // Null flavors also report their specialization chain
            let codes = NullFlavor::ALL
                .iter()
                .map(|v| {
                    let mut chain = Vec::new();
                    let mut current = v.parent();
                    while let Some(parent) = current {
                        chain.push(parent.as_str());
                        current = parent.parent();
                    }
                    let detail = if chain.is_empty() {
                        String::new()
                    } else {
                        format!("implies: {}", chain.join(" > "))
                    };
                    (v.as_str(), detail)
                })
                .collect::<Vec<_>>();
            list_system(&system, NullFlavor::CODE_SYSTEM, &codes, code.as_deref())
        }
        "ActClass" => plain!(ActClass),
        "ActMood" => plain!(ActMood),
        "ActRelationshipType" => plain!(ActRelationshipType),
        "ParticipationType" => plain!(ParticipationType),
        "EntityClass" => plain!(EntityClass),
        "EntityDeterminer" => plain!(EntityDeterminer),
        "RoleClass" => plain!(RoleClass),
        "AdministrativeGender" => plain!(AdministrativeGender),
        "TelecommunicationAddressUse" => plain!(TelecommunicationAddressUse),
        "PostalAddressUse" => plain!(PostalAddressUse),
        "EntityNameUse" => plain!(EntityNameUse),
        "AddressPartType" => plain!(AddressPartType),
        "EntityNamePartType" => plain!(EntityNamePartType),
        "EntityNamePartQualifier" => plain!(EntityNamePartQualifier),
        "SetOperator" => plain!(SetOperator),
        "CompressionAlgorithm" => plain!(CompressionAlgorithm),
        "IntegrityCheckAlgorithm" => plain!(IntegrityCheckAlgorithm),
        "BinaryDataEncoding" => plain!(BinaryDataEncoding),
        "TimingEvent" => plain!(TimingEvent),
        "CalendarCycle" => plain!(CalendarCycle),
        other => Err(format!("Unknown code system: {}", other).into()),
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
