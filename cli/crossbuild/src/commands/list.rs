//! `crossbuild --list`: show the resolved build matrix without building.

use std::fmt::Write as _;

use anyhow::Result;
use crossbuild_matrix::{BuildPair, Selector, TargetOs};
use serde::Serialize;

#[derive(Serialize)]
struct MatrixView<'a> {
    style: &'a str,
    os: Option<&'a str>,
    targets: &'a [BuildPair],
}

/// Print the matrix for `selector`, as a table or as JSON.
pub fn run(selector: &Selector, pairs: &[BuildPair], json: bool) -> Result<()> {
    if json {
        println!("{}", render_json(selector, pairs)?);
    } else {
        print!("{}", render(selector, pairs));
    }
    Ok(())
}

/// One line per OS, architectures in build order.
pub fn render(selector: &Selector, pairs: &[BuildPair]) -> String {
    let mut out = String::new();
    match selector.os {
        Some(os) => {
            let _ = writeln!(out, "Build matrix (os: {os}): {} targets", pairs.len());
        }
        None => {
            let _ = writeln!(
                out,
                "Build matrix (style: {}): {} targets",
                selector.style,
                pairs.len()
            );
        }
    }

    let mut rows: Vec<(TargetOs, Vec<&str>)> = Vec::new();
    for pair in pairs {
        if let Some((os, arches)) = rows.last_mut() {
            if *os == pair.os {
                arches.push(pair.arch.as_str());
                continue;
            }
        }
        rows.push((pair.os, vec![pair.arch.as_str()]));
    }
    for (os, arches) in rows {
        let _ = writeln!(out, "  {:<12} {}", os.as_str(), arches.join(" "));
    }
    out
}

pub fn render_json(selector: &Selector, pairs: &[BuildPair]) -> Result<String> {
    let view = MatrixView {
        style: selector.style.as_str(),
        os: selector.os.map(TargetOs::as_str),
        targets: pairs,
    };
    Ok(serde_json::to_string_pretty(&view)?)
}
