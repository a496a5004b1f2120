//! Command-line definitions.

use certyfikaty_fields::HexColor;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Certyfikaty - batch certificate generator
#[derive(Parser, Debug)]
#[command(name = "certyfikaty")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Send status lines to the log only instead of stdout
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render the template preview with field markers
    Preview {
        /// Template PDF path or URL
        #[arg(long, value_name = "SRC")]
        template: Option<String>,

        #[arg(long, short, default_value = "preview.png", value_name = "FILE")]
        output: PathBuf,

        /// KEY@X,Y[;size=N][;font=LABEL][;color=#rrggbb] in preview pixels
        #[arg(long = "field", value_name = "SPEC", value_parser = parse_field_spec)]
        fields: Vec<FieldSpec>,

        /// Move the last field by DX,DY pixels
        #[arg(long = "nudge", value_name = "DX,DY", value_parser = parse_nudge, allow_hyphen_values = true)]
        nudges: Vec<(f64, f64)>,
    },

    /// Show the dataset's record count, field keys and first rows
    Inspect {
        /// Workbook path or URL
        #[arg(long, value_name = "SRC")]
        data: Option<String>,
    },

    /// Generate one certificate per row and pack them into a zip
    Generate {
        #[arg(long, value_name = "SRC")]
        template: Option<String>,

        #[arg(long, value_name = "SRC")]
        data: Option<String>,

        #[arg(long = "field", value_name = "SPEC", value_parser = parse_field_spec, required = true)]
        fields: Vec<FieldSpec>,

        #[arg(long = "nudge", value_name = "DX,DY", value_parser = parse_nudge, allow_hyphen_values = true)]
        nudges: Vec<(f64, f64)>,

        /// Archive path (defaults to outputArchive from the config)
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the config path and effective values
    Show,
    /// Write the defaults to the config path
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// A field placement given on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub key: Option<String>,
    pub x: f64,
    pub y: f64,
    pub size: Option<f32>,
    pub font: Option<String>,
    pub color: Option<HexColor>,
}

fn parse_number<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T, String> {
    raw.trim()
        .parse()
        .map_err(|_| format!("invalid {} {:?}", what, raw.trim()))
}

fn parse_point(raw: &str) -> Result<(f64, f64), String> {
    let (x, y) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got {:?}", raw))?;
    Ok((parse_number(x, "x")?, parse_number(y, "y")?))
}

/// Parses `KEY@X,Y` with optional `;size=`, `;font=` and `;color=` parts.
/// The key may be omitted (`@X,Y` or `X,Y`).
pub fn parse_field_spec(raw: &str) -> Result<FieldSpec, String> {
    let mut parts = raw.split(';');
    let head = parts.next().unwrap_or_default();
    let (key, point) = match head.rsplit_once('@') {
        Some((key, point)) => (Some(key.trim()).filter(|k| !k.is_empty()), point),
        None => (None, head),
    };
    let (x, y) = parse_point(point)?;

    let mut spec = FieldSpec {
        key: key.map(str::to_string),
        x,
        y,
        size: None,
        font: None,
        color: None,
    };

    for part in parts.map(str::trim).filter(|p| !p.is_empty()) {
        let (name, value) = part
            .split_once('=')
            .ok_or_else(|| format!("expected name=value, got {:?}", part))?;
        match name.trim() {
            "size" => spec.size = Some(parse_number(value, "size")?),
            "font" => spec.font = Some(value.trim().to_string()),
            "color" => {
                spec.color = Some(value.trim().parse().map_err(|e| format!("{}", e))?)
            }
            other => return Err(format!("unknown field option {:?}", other)),
        }
    }
    Ok(spec)
}

pub fn parse_nudge(raw: &str) -> Result<(f64, f64), String> {
    parse_point(raw)
}
