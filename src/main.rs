// SPDX-License-Identifier: MPL-2.0
//! `case-designer` runs one design session from the command line: select a
//! product, optionally place a photo and edit it, then add the flattened
//! design to a cart.

use case_designer::cart::{CartLineItem, InMemoryCart, JsonFileCart};
use case_designer::catalog::CatalogSource;
use case_designer::compositor::{ExportFormat, LayerOp};
use case_designer::config::{self, Config};
use case_designer::domain::design::TemplateIndex;
use case_designer::error::{Error, Result};
use case_designer::media::AssetLoader;
use case_designer::session::{CartOptions, DesignSession, Designer};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
case-designer - compose a phone-case design and add it to a cart

USAGE:
  case-designer --product <ID> [OPTIONS]

OPTIONS:
  --catalog <PATH|URL>     Product catalog JSON (defaults to catalog_url from settings)
  --product <ID>           Product to design
  --template <N>           Template index (out of range falls back to 0)
  --image <PATH>           Photo to place on the case
  --op <OP>                Layer edit, repeatable: zoom-in, zoom-out, flip, rotate, reset, move:DX,DY
  --text <TEXT>            Customization text
  --quantity <N>           Quantity [default: 1]
  --output <PATH>          Flattened design file [default: design.png]
  --cart <PATH>            Append the line item to this JSON cart file
  --config <PATH>          Settings file
  --container-width <W>    Stage container width
  --viewport-height <H>    Viewport height
  -h, --help               Print help
";

#[derive(Debug)]
struct Args {
    catalog: Option<String>,
    product: String,
    template: Option<usize>,
    image: Option<PathBuf>,
    ops: Vec<LayerOp>,
    text: Option<String>,
    quantity: u32,
    output: PathBuf,
    cart: Option<PathBuf>,
    config: Option<PathBuf>,
    container_width: Option<f32>,
    viewport_height: Option<f32>,
}

fn parse_args() -> std::result::Result<Option<Args>, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }

    let parsed = Args {
        catalog: args.opt_value_from_str("--catalog")?,
        product: args.value_from_str("--product")?,
        template: args.opt_value_from_str("--template")?,
        image: args.opt_value_from_str("--image")?,
        ops: args.values_from_str("--op")?,
        text: args.opt_value_from_str("--text")?,
        quantity: args.opt_value_from_str("--quantity")?.unwrap_or(1),
        output: args
            .opt_value_from_str("--output")?
            .unwrap_or_else(|| PathBuf::from("design.png")),
        cart: args.opt_value_from_str("--cart")?,
        config: args.opt_value_from_str("--config")?,
        container_width: args.opt_value_from_str("--container-width")?,
        viewport_height: args.opt_value_from_str("--viewport-height")?,
    };

    let remaining = args.finish();
    if !remaining.is_empty() {
        tracing::warn!(?remaining, "ignoring unexpected arguments");
    }
    Ok(Some(parsed))
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("case_designer=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &Args) -> Config {
    let loaded = match &args.config {
        Some(path) => config::load_from_path(path),
        None => config::load(),
    };
    let mut config = loaded.unwrap_or_else(|err| {
        tracing::warn!(error = %err, "settings unavailable, using defaults");
        Config::default()
    });

    if let Some(width) = args.container_width {
        config.container_width = Some(width);
    }
    if let Some(height) = args.viewport_height {
        config.viewport_height = Some(height);
    }
    config
}

/// Relative template references resolve next to a catalog file unless an
/// asset root is configured.
fn default_asset_root(source: &CatalogSource) -> Option<PathBuf> {
    match source {
        CatalogSource::File(path) => path.parent().map(Path::to_path_buf),
        CatalogSource::Url(_) => None,
    }
}

async fn run(args: Args) -> Result<CartLineItem> {
    let mut config = load_config(&args);

    let catalog_ref = args
        .catalog
        .clone()
        .or_else(|| config.catalog_url.clone())
        .ok_or_else(|| Error::Config("no catalog given (--catalog or catalog_url)".into()))?;
    let source = CatalogSource::parse(&catalog_ref);
    if config.asset_root.is_none() {
        config.asset_root = default_asset_root(&source);
    }

    let catalog = source.load().await?;
    tracing::info!(products = catalog.len(), "catalog ready");

    let loader = AssetLoader::from_config(&config)?;
    let mut designer = Designer::new(DesignSession::from_config(&config), loader);

    designer.select_product(&catalog, &args.product).await?;
    if let Some(index) = args.template {
        designer.select_template(TemplateIndex::new(index)).await?;
    }
    designer.wait_for_backgrounds().await;

    if let Some(image) = &args.image {
        if let Err(err) = designer.upload_file(image).await {
            tracing::warn!(
                path = %image.display(),
                error = %err,
                "photo could not be loaded, exporting the template only"
            );
        }
    }
    for op in &args.ops {
        if !designer.apply(*op).await? {
            tracing::warn!(%op, "no photo on the stage, edit skipped");
        }
    }

    let options = CartOptions {
        custom_text: args.text.clone(),
        quantity: args.quantity,
    };
    let item = match &args.cart {
        Some(path) => designer.add_to_cart(&mut JsonFileCart::new(path), options).await?,
        None => designer.add_to_cart(&mut InMemoryCart::new(), options).await?,
    };

    let session = designer.session();
    let mut session = session.lock().await;
    let design = session.flatten()?;
    let mut output = args.output.clone();
    if ExportFormat::from_path(&output).is_none() {
        output.set_extension(ExportFormat::default().extension());
    }
    design.save_to_file(&output, None)?;
    tracing::info!(
        path = %output.display(),
        width = design.width(),
        height = design.height(),
        "design written"
    );

    if let Some(status) = session.status() {
        tracing::info!(severity = ?status.severity(), "{status}");
    }
    Ok(item)
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args = match parse_args() {
        Ok(Some(args)) => args,
        Ok(None) => {
            print!("{HELP}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("error: {err}\n\n{HELP}");
            return ExitCode::from(2);
        }
    };

    match run(args).await {
        Ok(item) => {
            println!(
                "{} x{} added to cart ({} each)",
                item.product_name, item.quantity, item.price
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "design failed");
            ExitCode::FAILURE
        }
    }
}
