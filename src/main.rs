//! # Laudo CLI
//!
//! Usage:
//!   laudo report.json -o laudo.pdf
//!   echo '{ ... }' | laudo -o laudo.pdf
//!   laudo report.json --config template.json
//!   laudo --example > report.json
//!
//! Set `RUST_LOG=debug` to see page breaks and skipped photos.

use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

use laudo::{ReportConfig, ReportError, ReportInput};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--example") {
        print!("{}", example_report_json());
        return;
    }

    if let Err(e) = run(&args) {
        eprintln!("✗ {}", e);
        process::exit(1);
    }
}

fn run(args: &[String]) -> Result<(), ReportError> {
    let input = if let Some(path) = input_path(args) {
        fs::read_to_string(path)?
    } else {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    };

    let config = match flag_value(args, "--config") {
        Some(path) => {
            log::info!("loading template config from {}", path);
            ReportConfig::load(path)?
        }
        None => ReportConfig::default(),
    };

    let input: ReportInput = serde_json::from_str(&input)?;

    let output_path = flag_value(args, "-o")
        .map(str::to_string)
        .unwrap_or_else(|| laudo::report_file_name_now(&input.record.municipality));

    let pdf_bytes = laudo::render_input(&input, &config);
    fs::write(&output_path, &pdf_bytes)?;
    log::info!("report for '{}' rendered", input.record.municipality);
    eprintln!("✓ Written {} bytes to {}", pdf_bytes.len(), output_path);
    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

/// Flags that consume the next argument as their value.
const VALUE_FLAGS: [&str; 2] = ["-o", "--config"];

/// First positional argument, skipping flags and their values.
fn input_path(args: &[String]) -> Option<&str> {
    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            rest.next();
        } else if !arg.starts_with('-') {
            return Some(arg);
        }
    }
    None
}

fn example_report_json() -> &'static str {
    r##"{
  "record": {
    "municipality": "Curitiba",
    "inspectionDate": "2026-03-14",
    "engineerId": "3",
    "municipalRegistration": "03.045.112.0001",
    "ownerName": "Maria Aparecida dos Santos",
    "requesterName": "Maria Aparecida dos Santos",
    "fullAddress": "Rua das Palmeiras, 420, Boqueirão, Curitiba",
    "coordinates": { "latitude": "-25.5035", "longitude": "-49.2431" },
    "typology": "Residencial Alvenaria",
    "typologyOther": "",
    "damageEntries": [
      {
        "damageType": "Cobertura",
        "technicalDescription": "Destelhamento parcial em aproximadamente 40% da área da cobertura, com ruptura de telhas de fibrocimento e deslocamento de cumeeiras pela ação do vento.",
        "photos": []
      },
      {
        "damageType": "Forro",
        "technicalDescription": "Forro de PVC com peças soltas e manchas de umidade decorrentes da infiltração de água pluvial.",
        "photos": []
      }
    ],
    "classification": "Danos Parciais"
  }
}
"##
}
