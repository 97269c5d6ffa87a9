//! CLI tool for cellgrid - drives a grid over a TSV file
//!
//! The first line of the input holds the column titles.
//!
//! Usage:
//!   cellgrid_cli <data.tsv> copy <row> <col> <rows> <cols>   # Print the range as TSV
//!   cellgrid_cli <data.tsv> paste <row> <col> <clip.tsv>     # Paste, print patches as JSON
//!   cellgrid_cli <data.tsv> paint [first_row]                # Print the window paint as JSON
//!
//! Options:
//!   --config <file.json>   Grid config (colors, geometry)
//!   --height <px>          Container height (default 600)
//!
//! Logging is controlled by `RUST_LOG` (e.g. `RUST_LOG=cellgrid=debug`).

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::cell::RefCell;
use std::env;
use std::fs;
use std::rc::Rc;

use cellgrid::clipboard::{text_to_matrix, TAB};
use cellgrid::layout::ScrollSource;
use cellgrid::{
    ColumnSchema, ColumnType, EventKind, Grid, GridConfig, GridEvent, GridSchema, Range,
    RowMatrixView,
};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: cellgrid_cli <data.tsv> [--config cfg.json] [--height px] \
                     (copy <row> <col> <rows> <cols> | paste <row> <col> <clip.tsv> | paint [first_row])";

fn fail(message: &str) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}

fn number(arg: Option<&String>) -> u32 {
    arg.and_then(|s| s.parse().ok())
        .unwrap_or_else(|| fail(USAGE))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args: Vec<String> = env::args().skip(1).collect();
    let mut config = GridConfig::default();
    let mut height = 600.0_f32;
    if let Some(i) = args.iter().position(|a| a == "--config") {
        let path = args.get(i + 1).cloned().unwrap_or_else(|| fail(USAGE));
        let json = fs::read_to_string(&path)
            .unwrap_or_else(|e| fail(&format!("Error reading {path}: {e}")));
        config = GridConfig::from_json(&json).unwrap_or_else(|e| fail(&e.to_string()));
        args.drain(i..=i + 1);
    }
    if let Some(i) = args.iter().position(|a| a == "--height") {
        height = args
            .get(i + 1)
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| fail(USAGE));
        args.drain(i..=i + 1);
    }
    if args.len() < 2 {
        fail(USAGE);
    }

    let input_path = &args[0];
    let text = fs::read_to_string(input_path)
        .unwrap_or_else(|e| fail(&format!("Error reading {input_path}: {e}")));
    let matrix = text_to_matrix(&text, TAB).unwrap_or_else(|e| fail(&e.to_string()));
    let Some((titles, rows)) = matrix.split_first() else {
        fail("Input has no header line");
    };
    let schema = GridSchema::new(
        titles
            .iter()
            .map(|t| ColumnSchema::new(t.as_str(), ColumnType::String))
            .collect(),
    );
    let view = RowMatrixView::from_strings(schema, rows);
    let mut grid = Grid::new(view, config, height);

    match args[1].as_str() {
        "copy" => {
            let range = Range::new(
                i64::from(number(args.get(2))),
                i64::from(number(args.get(3))),
                number(args.get(4)),
                number(args.get(5)),
            );
            print!("{}", grid.range_to_text(&range, false));
        }
        "paste" => {
            let (row, col) = (number(args.get(2)), number(args.get(3)));
            let clip_path = args.get(4).unwrap_or_else(|| fail(USAGE));
            let clip = fs::read_to_string(clip_path)
                .unwrap_or_else(|e| fail(&format!("Error reading {clip_path}: {e}")));

            let patches = Rc::new(RefCell::new(Vec::new()));
            let sink = Rc::clone(&patches);
            grid.on(
                EventKind::DataChanged,
                Box::new(move |event| {
                    if let GridEvent::DataChanged(p) = event {
                        sink.borrow_mut().extend(p.iter().cloned());
                    }
                    Ok(())
                }),
            );
            grid.select(&Range::new(i64::from(row), i64::from(col), 1, 1));
            grid.paste_text(&clip).unwrap_or_else(|e| fail(&e.to_string()));

            let json = serde_json::to_string_pretty(&*patches.borrow())
                .unwrap_or_else(|e| fail(&format!("Error serializing JSON: {e}")));
            println!("{json}");
        }
        "paint" => {
            let first_row = args.get(2).map_or(0, |_| number(args.get(2)));
            grid.set_first_row(i64::from(first_row), ScrollSource::Program);
            grid.focus();
            let json = serde_json::to_string_pretty(&grid.paint())
                .unwrap_or_else(|e| fail(&format!("Error serializing JSON: {e}")));
            println!("{json}");
        }
        _ => fail(USAGE),
    }
}
