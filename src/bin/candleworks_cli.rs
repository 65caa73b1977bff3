use candleworks::{
    blend::{BlendDefinition, BlendPricing},
    catalog::pretty_name,
    engine::{CandleEngine, Capabilities, Engine, Operation},
    inventory::InventorySummary,
    recipe::RecipeResult,
    storage::DocumentStore,
    BASE_WICKS,
};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, env, fs};

const DEFAULT_DATA_DIR: &str = ".";

#[derive(Serialize)]
struct CatalogEntry {
    key: String,
    name: String,
    cost_per_oz: f64,
}

#[derive(Serialize)]
struct WickEntry {
    key: String,
    name: String,
    cost_per_wick: f64,
}

#[derive(Serialize)]
struct CatalogListing {
    scents: Vec<CatalogEntry>,
    wicks: Vec<WickEntry>,
}

#[derive(Serialize)]
struct BlendListing {
    name: String,
    parts: String,
    pricing: BlendPricing,
    usable: bool,
}

#[derive(Serialize)]
struct ContainerListing {
    container_id: String,
    name: String,
    capacity_water_oz: f64,
    shape: String,
    supplier: String,
    cost_per_unit: f64,
}

#[derive(Serialize)]
struct ItemListing {
    item_id: String,
    sku: String,
    product_name: String,
    blend_name: String,
    container: String,
    quantity: u32,
    unit_cost: f64,
    target_price: f64,
    profit_per_unit: f64,
    margin_percent: f64,
}

#[derive(Serialize)]
struct StateSummary {
    scent_count: usize,
    blend_count: usize,
    container_count: usize,
    inventory: InventorySummary,
}

/// One-shot recipe computation request; either a saved blend name or an
/// explicit FO cost supplies the fragrance price.
#[derive(Deserialize)]
struct ComputeRequest {
    water_oz: f64,
    #[serde(default)]
    blend_name: Option<String>,
    #[serde(default)]
    fo_cost_per_oz: Option<f64>,
    #[serde(default)]
    wick_counts: HashMap<String, u32>,
}

#[derive(Serialize)]
struct ComputeResponse {
    fo_cost_per_oz: f64,
    warnings: Vec<String>,
    result: RecipeResult,
}

fn usage() {
    eprintln!(
        "Usage:\n  \
  candleworks_cli --version\n  \
  candleworks_cli [--data-dir DIR] capabilities\n  \
  candleworks_cli [--data-dir DIR] summary\n  \
  candleworks_cli [--data-dir DIR] catalog\n  \
  candleworks_cli [--data-dir DIR] blends\n  \
  candleworks_cli [--data-dir DIR] containers\n  \
  candleworks_cli [--data-dir DIR] search [QUERY]\n  \
  candleworks_cli [--data-dir DIR] price-blend BLEND_NAME|'<definition-json>'\n  \
  candleworks_cli [--data-dir DIR] compute '<request-json>'\n  \
  candleworks_cli [--data-dir DIR] op '<operation-json>'\n\n  \
  Tip: pass @file.json instead of inline JSON"
    );
}

fn load_json_arg(value: &str) -> Result<String, String> {
    if let Some(path) = value.strip_prefix('@') {
        fs::read_to_string(path).map_err(|e| format!("Could not read JSON file '{path}': {e}"))
    } else {
        Ok(value.to_string())
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Could not serialize JSON output: {e}"))?;
    println!("{text}");
    Ok(())
}

fn parse_global_data_dir_arg(args: &[String]) -> (String, usize) {
    if args.len() >= 3 && args[1] == "--data-dir" {
        return (args[2].clone(), 3);
    }
    (DEFAULT_DATA_DIR.to_string(), 1)
}

fn summarize(engine: &CandleEngine) -> StateSummary {
    StateSummary {
        scent_count: engine.state().scent_catalog().len(),
        blend_count: engine.state().blends.len(),
        container_count: engine.state().containers.len(),
        inventory: engine.summary(),
    }
}

fn list_catalog(engine: &CandleEngine) -> CatalogListing {
    CatalogListing {
        scents: engine
            .state()
            .scent_catalog()
            .entries()
            .into_iter()
            .map(|(key, cost_per_oz)| CatalogEntry {
                name: pretty_name(&key),
                key,
                cost_per_oz,
            })
            .collect(),
        wicks: BASE_WICKS
            .entries()
            .into_iter()
            .map(|(key, cost_per_wick)| WickEntry {
                name: pretty_name(&key),
                key,
                cost_per_wick,
            })
            .collect(),
    }
}

fn list_blends(engine: &CandleEngine) -> Vec<BlendListing> {
    let mut listings: Vec<BlendListing> = engine
        .state()
        .blends
        .iter()
        .map(|(name, blend)| {
            let pricing = engine.price_blend(blend);
            BlendListing {
                name: name.clone(),
                parts: blend.describe(),
                usable: pricing.valid_for_use(),
                pricing,
            }
        })
        .collect();
    listings.sort_by(|a, b| a.name.cmp(&b.name));
    listings
}

fn list_containers(engine: &CandleEngine) -> Vec<ContainerListing> {
    let mut listings: Vec<ContainerListing> = engine
        .state()
        .containers
        .iter()
        .map(|(container_id, container)| ContainerListing {
            container_id: container_id.clone(),
            name: container.name.clone(),
            capacity_water_oz: container.capacity_water_oz,
            shape: container.shape.clone(),
            supplier: container.supplier.clone(),
            cost_per_unit: container.cost_per_unit,
        })
        .collect();
    listings.sort_by(|a, b| a.container_id.cmp(&b.container_id));
    listings
}

/// Resolves the `price-blend` argument: inline JSON or `@file` prices an
/// ad-hoc definition, anything else names a saved blend.
fn price_blend_arg(engine: &CandleEngine, arg: &str) -> Result<BlendPricing, String> {
    if arg.trim_start().starts_with('{') || arg.starts_with('@') {
        let json = load_json_arg(arg)?;
        let blend: BlendDefinition = serde_json::from_str(&json)
            .map_err(|e| format!("Invalid blend definition JSON: {e}"))?;
        Ok(engine.price_blend(&blend))
    } else {
        engine.price_saved_blend(arg).map_err(|e| e.to_string())
    }
}

fn list_items(engine: &CandleEngine, query: &str) -> Vec<ItemListing> {
    engine
        .search(query)
        .into_iter()
        .map(|(item_id, item)| ItemListing {
            item_id: item_id.clone(),
            sku: item.sku.clone(),
            product_name: item.product_name.clone(),
            blend_name: item.blend_name.clone(),
            container: engine.state().container_name(&item.container_id),
            quantity: item.quantity,
            unit_cost: item.unit_cost(),
            target_price: item.target_price,
            profit_per_unit: item.profit_per_unit(),
            margin_percent: item.margin_percent(),
        })
        .collect()
}

fn compute(engine: &CandleEngine, request: ComputeRequest) -> Result<ComputeResponse, String> {
    let (fo_cost, warnings) = match (request.fo_cost_per_oz, &request.blend_name) {
        (Some(cost), _) => (cost, Vec::new()),
        (None, Some(name)) => {
            let pricing = engine.price_saved_blend(name).map_err(|e| e.to_string())?;
            if !pricing.valid_for_use() {
                return Err(format!(
                    "Blend '{name}' is not usable: {}",
                    pricing.warnings.join("; ")
                ));
            }
            (pricing.cost_per_oz, pricing.warnings)
        }
        (None, None) => {
            return Err("Provide either blend_name or fo_cost_per_oz".to_string());
        }
    };
    let result = engine.compute_recipe(request.water_oz, fo_cost, &request.wick_counts);
    Ok(ComputeResponse {
        fo_cost_per_oz: fo_cost,
        warnings,
        result,
    })
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args: Vec<String> = env::args().collect();
    if args.len() <= 1 {
        usage();
        return Err("Missing command".to_string());
    }
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("candleworks {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let (data_dir, cmd_idx) = parse_global_data_dir_arg(&args);
    if args.len() <= cmd_idx {
        usage();
        return Err("Missing command".to_string());
    }

    let command = &args[cmd_idx];

    match command.as_str() {
        "capabilities" => {
            let caps: Capabilities = CandleEngine::capabilities();
            print_json(&caps)
        }
        "summary" => {
            let engine = CandleEngine::open(DocumentStore::new(&data_dir));
            print_json(&summarize(&engine))
        }
        "catalog" => {
            let engine = CandleEngine::open(DocumentStore::new(&data_dir));
            print_json(&list_catalog(&engine))
        }
        "blends" => {
            let engine = CandleEngine::open(DocumentStore::new(&data_dir));
            print_json(&list_blends(&engine))
        }
        "containers" => {
            let engine = CandleEngine::open(DocumentStore::new(&data_dir));
            print_json(&list_containers(&engine))
        }
        "search" => {
            let query = args.get(cmd_idx + 1).map(String::as_str).unwrap_or("");
            let engine = CandleEngine::open(DocumentStore::new(&data_dir));
            print_json(&list_items(&engine, query))
        }
        "price-blend" => {
            let arg = args.get(cmd_idx + 1).ok_or_else(|| {
                "price-blend requires a blend name or definition JSON".to_string()
            })?;
            let engine = CandleEngine::open(DocumentStore::new(&data_dir));
            print_json(&price_blend_arg(&engine, arg)?)
        }
        "compute" => {
            let json = load_json_arg(
                args.get(cmd_idx + 1)
                    .ok_or_else(|| "Missing compute request JSON".to_string())?,
            )?;
            let request: ComputeRequest = serde_json::from_str(&json)
                .map_err(|e| format!("Invalid compute request JSON: {e}"))?;
            let engine = CandleEngine::open(DocumentStore::new(&data_dir));
            print_json(&compute(&engine, request)?)
        }
        "op" => {
            let json = load_json_arg(
                args.get(cmd_idx + 1)
                    .ok_or_else(|| "Missing operation JSON".to_string())?,
            )?;
            let op: Operation =
                serde_json::from_str(&json).map_err(|e| format!("Invalid operation JSON: {e}"))?;
            let mut engine = CandleEngine::open(DocumentStore::new(&data_dir));
            let result = engine.apply(op).map_err(|e| e.to_string())?;
            print_json(&result)
        }
        _ => {
            usage();
            Err(format!("Unknown command '{command}'"))
        }
    }
}
