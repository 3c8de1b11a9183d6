use std::path::{Path, PathBuf};

use clap::Args;
use homevision::config::AppConfig;
use homevision::designs::{DesignRecord, SourceImage, DEFAULT_STYLE};
use homevision::error::AppError;
use homevision::telemetry;

use crate::infra::build_design_service;

#[derive(Args, Debug)]
pub(crate) struct RenovateArgs {
    /// Room photo to renovate
    #[arg(long)]
    pub(crate) image: PathBuf,
    /// Interior style to apply
    #[arg(long, default_value = DEFAULT_STYLE)]
    pub(crate) style: String,
    /// Write the rendered PNG to this path
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

/// One-shot pipeline run against the configured models, without starting the server.
pub(crate) async fn run_renovation_preview(args: RenovateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let bytes = std::fs::read(&args.image)?;
    let source = SourceImage::with_declared_type(bytes, Some(guess_mime(&args.image).as_str()));

    let service = build_design_service(&config.gemini)?;
    let design_id = service.create_design(source, &args.style).await?;
    let record = service.get_design(&design_id)?;

    if let Some(output) = &args.output {
        std::fs::write(output, record.image.bytes())?;
    }

    print!("{}", render_preview(&record, args.output.as_deref()));
    Ok(())
}

fn guess_mime(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or("image/jpeg")
        .to_string()
}

fn render_preview(record: &DesignRecord, output: Option<&Path>) -> String {
    let mut out = String::new();
    out.push_str("Renovation preview\n");
    out.push_str(&format!("Design id: {}\n", record.id));
    out.push_str(&format!(
        "Style: {} (rendered {})\n",
        record.style,
        record.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    match output {
        Some(path) => out.push_str(&format!("Image written to {}\n", path.display())),
        None => out.push_str(&format!(
            "Image: {} bytes (pass --output to save it)\n",
            record.image.bytes().len()
        )),
    }

    if record.inventory.is_empty() {
        out.push_str("\nInventory: none\n");
        return out;
    }

    out.push_str("\nInstallment items\n");
    let items = record.installment_items();
    for item in &items {
        out.push_str(&format!(
            "- [{}] {} ({}): PHP {}\n  {}\n",
            item.id, item.name, item.category, item.price, item.description
        ));
    }
    let total: u64 = items.iter().map(|item| item.price).sum();
    out.push_str(&format!("Total estimate: PHP {total}\n"));
    out
}
