//! Subcommand bodies: load the save and the scene snapshot, drive a
//! [`Session`], print or write the result.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use layoutkeeper_recon::classify::area_partition;
use layoutkeeper_recon::export::import_link;
use layoutkeeper_recon::model::{HousingArea, HousingItem, ReconSummary};
use layoutkeeper_recon::scene::LiveScene;
use layoutkeeper_recon::source::{JsonLayoutFile, LayoutSink};
use layoutkeeper_recon::{Partition, ReconConfig, SceneTable, Session};

use crate::exit_codes::{EXIT_CONFIG, EXIT_ERROR, EXIT_IMPORT, EXIT_LAYOUT_DRIFT, EXIT_WRITE};
use crate::{CliError, ConfigCommands};

// ---------------------------------------------------------------------------
// IO helpers
// ---------------------------------------------------------------------------

fn open_session(path: &Path) -> Result<Session, CliError> {
    let mut session = Session::new();
    session.load(&JsonLayoutFile::new(path))?;
    Ok(session)
}

fn open_scene(path: &Path) -> Result<SceneTable, CliError> {
    let json = std::fs::read_to_string(path).map_err(|e| {
        CliError::with_code(EXIT_IMPORT, format!("cannot read {}: {e}", path.display()))
    })?;
    SceneTable::from_json(&json).map_err(|e| {
        CliError::from(e).with_hint("a scene snapshot needs \"area\" and an \"objects\" array")
    })
}

fn write_scene(path: &Path, scene: &SceneTable) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(&scene.to_snapshot())
        .map_err(|e| CliError::with_code(EXIT_ERROR, format!("JSON serialization error: {e}")))?;
    std::fs::write(path, json).map_err(|e| {
        CliError::with_code(EXIT_WRITE, format!("cannot write {}: {e}", path.display()))
    })
}

fn save_session(session: &Session, path: &Path) -> Result<(), CliError> {
    JsonLayoutFile::new(path).save(&session.saved_layout())?;
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::with_code(EXIT_ERROR, format!("JSON serialization error: {e}")))?;
    println!("{json}");
    Ok(())
}

/// Lists that live in a save file. `unused` only exists after a reconcile.
fn saved_list(partition: Partition) -> Result<Partition, CliError> {
    if partition == Partition::Unused {
        return Err(CliError::args("the unused list is not stored in a layout file")
            .with_hint("use --list interior or --list exterior"));
    }
    Ok(partition)
}

// ---------------------------------------------------------------------------
// Output shapes
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ItemRow<'a> {
    index: usize,
    item_key: u32,
    name: &'a str,
    x: f32,
    y: f32,
    z: f32,
    rotate: f32,
    stain: u32,
    material_item_key: u32,
    live: Option<String>,
    correct_location: bool,
    correct_rotation: bool,
    dye_match: bool,
}

impl<'a> ItemRow<'a> {
    fn new(index: usize, item: &'a HousingItem) -> Self {
        Self {
            index,
            item_key: item.item_key,
            name: &item.name,
            x: item.pose.x,
            y: item.pose.y,
            z: item.pose.z,
            rotate: item.pose.rotate,
            stain: item.stain,
            material_item_key: item.material_item_key,
            live: item.live.map(|h| h.to_string()),
            correct_location: item.correct_location,
            correct_rotation: item.correct_rotation,
            dye_match: item.dye_match,
        }
    }
}

#[derive(Serialize)]
struct ReconcileOutput<'a> {
    summary: &'a ReconSummary,
    interior: Vec<ItemRow<'a>>,
    exterior: Vec<ItemRow<'a>>,
    unused: Vec<ItemRow<'a>>,
}

fn rows(items: &[HousingItem]) -> Vec<ItemRow<'_>> {
    items.iter().enumerate().map(|(i, item)| ItemRow::new(i, item)).collect()
}

fn status(partition: Partition, item: &HousingItem) -> &'static str {
    if partition == Partition::Unused {
        "unused"
    } else if item.is_missing() {
        "missing"
    } else if !item.correct_location {
        "moved"
    } else if !item.correct_rotation {
        "rotated"
    } else if !item.dye_match {
        "dye"
    } else {
        "ok"
    }
}

fn print_list(partition: Partition, items: &[HousingItem]) {
    println!("{partition} ({})", items.len());
    for (i, item) in items.iter().enumerate() {
        let p = &item.pose;
        println!(
            "  {i:>3}  {:<8} {:<28} {:>8.2} {:>8.2} {:>8.2} {:>7.3}",
            status(partition, item),
            item.name,
            p.x,
            p.y,
            p.z,
            p.rotate
        );
    }
}

fn drift(summary: &ReconSummary) -> usize {
    summary.missing + summary.misplaced + summary.misrotated + summary.dye_mismatches
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

pub fn cmd_reconcile(
    config: &ReconConfig,
    layout: PathBuf,
    scene: PathBuf,
    json: bool,
    strict: bool,
) -> Result<(), CliError> {
    let mut session = open_session(&layout)?;
    let scene = open_scene(&scene)?;
    let summary = session.reconcile(&scene, config)?;

    if json {
        print_json(&ReconcileOutput {
            summary: &summary,
            interior: rows(session.items(Partition::Interior)),
            exterior: rows(session.items(Partition::Exterior)),
            unused: rows(session.items(Partition::Unused)),
        })?;
    } else {
        let active = area_partition(scene.area());
        print_list(active, session.items(active));
        print_list(Partition::Unused, session.items(Partition::Unused));
        println!(
            "{}: {} matched, {} missing, {} unused, {} moved, {} rotated, {} dye",
            scene.area(),
            summary.matched,
            summary.missing,
            summary.unused,
            summary.misplaced,
            summary.misrotated,
            summary.dye_mismatches
        );
    }

    if strict && drift(&summary) > 0 {
        return Err(CliError::with_code(
            EXIT_LAYOUT_DRIFT,
            format!("{} saved items are missing or out of place", drift(&summary)),
        )
        .with_hint("run `lk apply` to move matched furniture back"));
    }
    Ok(())
}

pub fn cmd_apply(
    config: &ReconConfig,
    layout: PathBuf,
    scene_path: PathBuf,
    dyes: bool,
    output: Option<PathBuf>,
    json: bool,
) -> Result<(), CliError> {
    let mut session = open_session(&layout)?;
    let mut scene = open_scene(&scene_path)?;

    let report = if dyes {
        session.apply_dyes(&mut scene, config)?
    } else {
        session.apply_layout(&mut scene, config)?
    };

    if let Some(out) = &output {
        write_scene(out, &scene)?;
    }

    if json {
        print_json(&report)?;
    } else {
        let verb = if dyes { "dyed" } else { "moved" };
        println!(
            "{} {verb}, {} already correct, {} missing",
            report.written, report.already_correct, report.missing
        );
        if report.skipped_floor > 0 {
            println!("{} left alone on disabled floors", report.skipped_floor);
        }
    }
    Ok(())
}

pub fn cmd_set(
    config: &ReconConfig,
    layout: PathBuf,
    scene_path: PathBuf,
    list: Option<Partition>,
    index: usize,
    dye: bool,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let mut session = open_session(&layout)?;
    let mut scene = open_scene(&scene_path)?;
    session.reconcile(&scene, config)?;

    let partition = list.unwrap_or_else(|| area_partition(scene.area()));
    if dye {
        session.set_item_dye(partition, index, &mut scene)?;
    } else {
        session.set_item_position(partition, index, &mut scene)?;
    }

    if let Some(out) = &output {
        write_scene(out, &scene)?;
    }

    let name = &session.items(partition)[index].name;
    println!("set {partition} #{index} ({name})");
    Ok(())
}

pub fn cmd_capture(layout: PathBuf, scene_path: PathBuf) -> Result<(), CliError> {
    let mut session = if layout.exists() {
        open_session(&layout)?
    } else {
        Session::new()
    };
    let scene = open_scene(&scene_path)?;

    let count = session.capture(&scene)?;
    save_session(&session, &layout)?;

    println!("captured {count} {} items into {}", scene.area(), layout.display());
    Ok(())
}

pub fn cmd_sort(layout: PathBuf, list: Partition, output: Option<PathBuf>) -> Result<(), CliError> {
    let list = saved_list(list)?;
    let mut session = open_session(&layout)?;
    session.sort(list);

    let out = output.unwrap_or(layout);
    save_session(&session, &out)?;
    println!("sorted {} {list} items", session.items(list).len());
    Ok(())
}

pub fn cmd_clear(
    layout: PathBuf,
    list: Partition,
    fixtures: bool,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let list = saved_list(list)?;
    let mut session = open_session(&layout)?;

    if fixtures {
        let area = match list {
            Partition::Interior => HousingArea::Indoors,
            _ => HousingArea::Outdoors,
        };
        session.clear_fixtures(area);
    } else {
        session.clear(list);
    }

    let out = output.unwrap_or(layout);
    save_session(&session, &out)?;
    let what = if fixtures { "fixtures" } else { "items" };
    println!("cleared {list} {what}");
    Ok(())
}

#[derive(Serialize)]
struct ExportRow<'a> {
    item_key: u32,
    name: &'a str,
    count: usize,
}

#[derive(Serialize)]
struct ExportOutput<'a> {
    items: Vec<ExportRow<'a>>,
    link: String,
}

pub fn cmd_export(config: &ReconConfig, layout: PathBuf, json: bool) -> Result<(), CliError> {
    let session = open_session(&layout)?;
    let counts = session.item_counts();

    let mut names: BTreeMap<u32, &str> = BTreeMap::new();
    for item in session
        .items(Partition::Interior)
        .iter()
        .chain(session.items(Partition::Exterior))
    {
        names.entry(item.item_key).or_insert(&item.name);
    }

    let items: Vec<ExportRow> = counts
        .iter()
        .map(|(&item_key, &count)| ExportRow {
            item_key,
            name: names.get(&item_key).copied().unwrap_or(""),
            count,
        })
        .collect();
    let link = import_link(&config.export.base_url, &counts);

    if json {
        print_json(&ExportOutput { items, link })?;
    } else {
        for row in &items {
            println!("{:>8}  {:>4}  {}", row.item_key, row.count, row.name);
        }
        println!("{link}");
    }
    Ok(())
}

pub fn cmd_config(cmd: ConfigCommands, global: Option<PathBuf>) -> Result<(), CliError> {
    let resolved = || {
        global.clone().or_else(ReconConfig::default_path).ok_or_else(|| {
            CliError::with_code(EXIT_CONFIG, "no config directory on this platform")
                .with_hint("pass --config <path>")
        })
    };

    match cmd {
        ConfigCommands::Path => {
            println!("{}", resolved()?.display());
            Ok(())
        }
        ConfigCommands::Validate { path } => {
            let path = match path {
                Some(p) => p,
                None => resolved()?,
            };
            let s = std::fs::read_to_string(&path).map_err(|e| {
                CliError::with_code(EXIT_CONFIG, format!("cannot read {}: {e}", path.display()))
            })?;
            ReconConfig::from_toml(&s)?;
            println!("ok: {}", path.display());
            Ok(())
        }
    }
}
