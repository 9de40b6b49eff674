use std::io::{self, Write as _};

use tetrus_engine::{PieceKind, Rotation};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PiecesArg {
    /// Only print this kind (I, J, L, O, S, T or Z)
    #[arg(long, value_parser = parse_kind)]
    kind: Option<PieceKind>,
}

fn parse_kind(s: &str) -> Result<PieceKind, String> {
    let mut chars = s.chars();
    match (chars.next().map(|c| c.to_ascii_uppercase()), chars.next()) {
        (Some(c), None) => {
            PieceKind::from_char(c).ok_or_else(|| format!("unknown piece kind: {s}"))
        }
        _ => Err(format!("unknown piece kind: {s}")),
    }
}

pub(crate) fn run(arg: &PiecesArg) -> anyhow::Result<()> {
    let kinds: Vec<PieceKind> = match arg.kind {
        Some(kind) => vec![kind],
        None => PieceKind::ALL.to_vec(),
    };

    let mut out = io::stdout().lock();
    for kind in kinds {
        writeln!(out, "{kind}")?;
        for line in render_phases(kind) {
            writeln!(out, "{}", line.trim_end())?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Renders the four phases of `kind` side by side, one 4x4 box each.
fn render_phases(kind: PieceKind) -> [String; 4] {
    let mut boxes = [[[false; 4]; 4]; Rotation::COUNT];
    let mut rotation = Rotation::SPAWN;
    for grid in &mut boxes {
        for (col, row) in kind.cells(rotation) {
            grid[usize::from(row)][usize::from(col)] = true;
        }
        rotation = rotation.rotated_right();
    }

    std::array::from_fn(|row| {
        boxes
            .iter()
            .map(|grid| {
                grid[row]
                    .iter()
                    .map(|&filled| if filled { '#' } else { '.' })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("  ")
    })
}
