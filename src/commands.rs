//! Command implementations.

use crate::assets::{self, Origin};
use crate::cli::{Command, ConfigAction, FieldSpec};
use crate::config::{self, AppConfig};
use anyhow::{anyhow, bail, Context};
use certyfikaty_core::{
    pack, BatchEvent, BatchOptions, CoreError, ProgressReporter, Session, Status,
};
use certyfikaty_fields::{to_document_space, ValueResolver, DEFAULT_KEY};
use certyfikaty_sheet::field_keys;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub fn dispatch(
    command: Command,
    config: &AppConfig,
    config_path: &Path,
    reporter: &mut dyn ProgressReporter,
) -> anyhow::Result<()> {
    match command {
        Command::Preview {
            template,
            output,
            fields,
            nudges,
        } => preview(config, template.as_deref(), &output, &fields, &nudges, reporter),
        Command::Inspect { data } => inspect(config, data.as_deref(), reporter),
        Command::Generate {
            template,
            data,
            fields,
            nudges,
            output,
        } => generate(
            config,
            template.as_deref(),
            data.as_deref(),
            &fields,
            &nudges,
            output,
            reporter,
        ),
        Command::Config { action } => config_command(action, config, config_path),
    }
}

fn resolver(config: &AppConfig) -> ValueResolver {
    ValueResolver::new(config.field_marker)
}

/// Converts a prerequisite failure into its status line and an error.
fn missing(err: CoreError, reporter: &mut dyn ProgressReporter) -> anyhow::Error {
    match err.status() {
        Some(status) => {
            reporter.report(&status);
            anyhow!("{}", status)
        }
        None => err.into(),
    }
}

fn load_template(
    session: &mut Session,
    config: &AppConfig,
    source: Option<&str>,
    reporter: &mut dyn ProgressReporter,
) -> anyhow::Result<()> {
    let Some(asset) = assets::load(source, &config.default_template)? else {
        reporter.report(&Status::DefaultMissing {
            name: config.default_template.clone(),
        });
        return Ok(());
    };
    session
        .load_template(asset.bytes)
        .with_context(|| format!("invalid template {}", asset.source))?;
    if asset.origin == Origin::Default {
        reporter.report(&Status::DefaultTemplateUsed);
    }
    Ok(())
}

fn load_dataset(
    session: &mut Session,
    config: &AppConfig,
    source: Option<&str>,
    reporter: &mut dyn ProgressReporter,
) -> anyhow::Result<()> {
    let Some(asset) = assets::load(source, &config.default_dataset)? else {
        reporter.report(&Status::DefaultMissing {
            name: config.default_dataset.clone(),
        });
        return Ok(());
    };
    let records = session
        .load_dataset(&asset.bytes)
        .with_context(|| format!("invalid workbook {}", asset.source))?;
    if asset.origin == Origin::Default {
        reporter.report(&Status::DefaultDatasetUsed);
    }
    reporter.report(&Status::Loaded { records });

    if !config.date_columns.is_empty() {
        if let Some(dataset) = session.dataset_mut() {
            dataset.promote_date_columns(&config.date_columns, &resolver(config));
        }
    }
    Ok(())
}

fn place_fields(
    session: &mut Session,
    config: &AppConfig,
    fields: &[FieldSpec],
    nudges: &[(f64, f64)],
    reporter: &mut dyn ProgressReporter,
) -> anyhow::Result<()> {
    for spec in fields {
        let key = spec.key.clone().unwrap_or_else(|| DEFAULT_KEY.to_string());
        let font = spec.font.clone().unwrap_or_else(|| config.default_font.clone());
        session
            .add_field(
                key,
                spec.x,
                spec.y,
                spec.size.unwrap_or(config.default_font_size),
                font,
                spec.color.unwrap_or(config.default_color),
            )
            .map_err(|e| missing(e, reporter))?;
    }
    for (dx, dy) in nudges {
        if !session.nudge_last(*dx, *dy) {
            log::warn!("[Fields] nothing to nudge");
        }
    }
    Ok(())
}

fn preview(
    config: &AppConfig,
    template: Option<&str>,
    output: &Path,
    fields: &[FieldSpec],
    nudges: &[(f64, f64)],
    reporter: &mut dyn ProgressReporter,
) -> anyhow::Result<()> {
    let mut session = Session::new(config.preview_width);
    load_template(&mut session, config, template, reporter)?;
    place_fields(&mut session, config, fields, nudges, reporter)?;

    let (Some(template), Some(geometry)) = (session.template(), session.geometry()) else {
        return Err(missing(CoreError::MissingTemplate, reporter));
    };

    let pdfium = certyfikaty_render::bind_pdfium()?;
    let mut image = certyfikaty_render::render_preview(&pdfium, template.bytes(), geometry)?;
    certyfikaty_render::draw_field_markers(&mut image, session.fields());
    certyfikaty_render::save_png(&image, output)?;

    println!(
        "{}: {}x{} px, page {:.2}x{:.2} pt, scale {:.4}",
        output.display(),
        image.width(),
        image.height(),
        geometry.native_width,
        geometry.native_height,
        geometry.scale
    );
    for field in session.fields() {
        let (x, y) = to_document_space(field.x, field.y, geometry);
        println!(
            "  {} @ {},{} px -> {:.2},{:.2} pt",
            field.key, field.x, field.y, x, y
        );
    }
    Ok(())
}

fn inspect(
    config: &AppConfig,
    data: Option<&str>,
    reporter: &mut dyn ProgressReporter,
) -> anyhow::Result<()> {
    let mut session = Session::new(config.preview_width);
    load_dataset(&mut session, config, data, reporter)?;
    let Some(dataset) = session.dataset() else {
        return Err(missing(CoreError::MissingDataset, reporter));
    };

    let keys = field_keys(dataset.headers(), config.field_marker);
    println!("{}", keys.join(", "));
    println!("{}", dataset.preview_json()?);
    Ok(())
}

fn generate(
    config: &AppConfig,
    template: Option<&str>,
    data: Option<&str>,
    fields: &[FieldSpec],
    nudges: &[(f64, f64)],
    output: Option<PathBuf>,
    reporter: &mut dyn ProgressReporter,
) -> anyhow::Result<()> {
    let mut session = Session::new(config.preview_width);
    load_template(&mut session, config, template, reporter)?;
    load_dataset(&mut session, config, data, reporter)?;
    place_fields(&mut session, config, fields, nudges, reporter)?;

    let options = BatchOptions {
        resolver: resolver(config),
        primary_key: config.primary_key.clone(),
        locale: config.locale,
        fail_fast: config.fail_fast,
        row_delay: Duration::from_millis(config.row_delay_ms),
    };
    let handle = session
        .spawn_generate(options)
        .map_err(|e| missing(e, reporter))?;
    reporter.report(&Status::Generating);

    for event in handle.events().iter() {
        match event {
            BatchEvent::Progress { done, total } => {
                reporter.report(&Status::Progress { done, total })
            }
            BatchEvent::RowFailed(failure) => reporter.report(&Status::RowFailed {
                row: failure.row_number,
                name: failure.name,
                error: failure.error,
            }),
        }
    }
    let report = handle.join()?;

    if report.cancelled {
        reporter.report(&Status::Cancelled {
            done: report.processed(),
            total: report.total,
        });
    }
    if report.documents.is_empty() {
        bail!("no certificates were generated");
    }

    let archive = pack(&report.documents)?;
    let path = output.unwrap_or_else(|| PathBuf::from(&config.output_archive));
    std::fs::write(&path, &archive).with_context(|| format!("cannot write {}", path.display()))?;
    log::info!("[Generate] wrote {} ({} bytes)", path.display(), archive.len());

    reporter.report(&Status::Done);
    reporter.report(&Status::Summary {
        generated: report.documents.len(),
        total: report.total,
        failed: report.failures.len(),
    });
    Ok(())
}

fn config_command(action: ConfigAction, config: &AppConfig, path: &Path) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            println!("{}", path.display());
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                bail!("{} already exists, use --force to overwrite", path.display());
            }
            config::save_config(path, &AppConfig::default())?;
            println!("{}", path.display());
        }
    }
    Ok(())
}
