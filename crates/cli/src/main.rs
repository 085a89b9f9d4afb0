use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use glyphmesh::prelude::*;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod provenance;
mod records;
mod table;

use provenance::Payload;
use records::{FillRuleRecord, GlyphFile, GlyphRecord, MeshFile};

#[derive(Parser)]
#[command(name = "glyphmesh")]
#[command(about = "Vectorise glyph outlines into polygon meshes")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Build geometry for every glyph of an outline file
    Run(RunArgs),
    /// Write an outline file of sampled glyph-like shapes
    Demo {
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 1)]
        glyphs: u32,
        #[arg(long, default_value_t = 12)]
        vertices: usize,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a provenance block, or summarize a points table
    Report {
        #[arg(long)]
        points: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum KindArg {
    Outline,
    Polygon,
    Extrude,
}

impl KindArg {
    fn name(self) -> &'static str {
        match self {
            KindArg::Outline => "outline",
            KindArg::Polygon => "polygon",
            KindArg::Extrude => "extrude",
        }
    }
}

#[derive(Args, Debug)]
struct RunArgs {
    #[arg(long)]
    input: PathBuf,
    #[arg(long)]
    out: PathBuf,
    #[arg(long, value_enum, default_value_t = KindArg::Polygon)]
    kind: KindArg,
    /// Polygon face outset
    #[arg(long, default_value_t = 0.0)]
    outset: f64,
    #[arg(long, default_value_t = 1.0)]
    depth: f64,
    #[arg(long, default_value_t = 0.0)]
    front_outset: f64,
    #[arg(long, default_value_t = 0.0)]
    back_outset: f64,
    /// Override the winding rule stored with each glyph
    #[arg(long, value_enum)]
    fill_rule: Option<FillRuleRecord>,
    /// Also write the flattened points table (.csv or .parquet)
    #[arg(long)]
    points: Option<PathBuf>,
}

impl RunArgs {
    fn geometry_kind(&self) -> GeometryKind {
        match self.kind {
            KindArg::Outline => GeometryKind::Outline,
            KindArg::Polygon => GeometryKind::Polygon {
                outset: self.outset,
            },
            KindArg::Extrude => GeometryKind::Extrude(ExtrudeCfg {
                depth: self.depth,
                front_outset: self.front_outset,
                back_outset: self.back_outset,
            }),
        }
    }

    /// Outset shown in the points table: the one shaping the visible face.
    fn face_outset(&self) -> f64 {
        match self.kind {
            KindArg::Outline => 0.0,
            KindArg::Polygon => self.outset,
            KindArg::Extrude => self.front_outset,
        }
    }
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Run(args) => run(&args),
        Action::Demo {
            seed,
            glyphs,
            vertices,
            out,
        } => demo(seed, glyphs, vertices, &out),
        Action::Report { points } => report(points.as_deref()),
    }
}

fn run(args: &RunArgs) -> Result<()> {
    tracing::info!(
        input = %args.input.display(),
        out = %args.out.display(),
        kind = args.kind.name(),
        "run"
    );
    let font = GlyphFile::read(&args.input)?.to_source();
    if font.is_empty() {
        bail!("{} holds no glyphs", args.input.display());
    }
    let kind = args.geometry_kind();
    let fill_rule = args.fill_rule.map(FillRule::from);
    let ids: Vec<u32> = font.keys().copied().collect();
    let results = build_all(&font, &ids, &kind, fill_rule);
    let failed = results.iter().filter(|r| r.is_err()).count();

    let doc = MeshFile::from_results(args.kind.name(), &ids, &results);
    ensure_parent(&args.out)?;
    fs::write(&args.out, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", args.out.display()))?;

    let mut outputs = vec![args.out.clone()];
    if let Some(points) = &args.points {
        let mut df = table::points_frame(&font, args.face_outset())?;
        ensure_parent(points)?;
        table::write_points(&mut df, points)?;
        tracing::info!(rows = df.height(), cols = df.width(), "points_table");
        outputs.push(points.clone());
    }

    let payload = Payload::new(
        "run",
        json!({
            "kind": kind_params(&kind),
            "fill_rule": args.fill_rule,
            "glyphs": ids.len(),
            "failed": failed
        }),
    )
    .with_input(&args.input);
    let prov = provenance::write_sidecar(&outputs, payload)?;
    tracing::info!(glyphs = ids.len(), failed, provenance = %prov.display(), "run_done");
    Ok(())
}

fn kind_params(kind: &GeometryKind) -> serde_json::Value {
    match *kind {
        GeometryKind::Outline => json!({"name": "outline"}),
        GeometryKind::Polygon { outset } => json!({"name": "polygon", "outset": outset}),
        GeometryKind::Extrude(cfg) => json!({
            "name": "extrude",
            "depth": cfg.depth,
            "front_outset": cfg.front_outset,
            "back_outset": cfg.back_outset
        }),
    }
}

fn demo(seed: u64, glyphs: u32, vertices: usize, out: &Path) -> Result<()> {
    tracing::info!(seed, glyphs, vertices, out = %out.display(), "demo");
    let cfg = RadialCfg {
        vertex_count: VertexCount::Fixed(vertices),
        ..RadialCfg::default()
    };
    let advance = [2.4 * cfg.base_radius, 0.0];
    let file = GlyphFile {
        glyphs: (0..glyphs)
            .map(|id| {
                let tok = ReplayToken {
                    seed,
                    index: u64::from(id),
                };
                GlyphRecord::from_outline(id, &draw_outline_radial(cfg, tok), advance)
            })
            .collect(),
    };
    ensure_parent(out)?;
    fs::write(out, serde_json::to_vec_pretty(&file)?)
        .with_context(|| format!("writing {}", out.display()))?;
    let payload = Payload::new(
        "demo",
        json!({"seed": seed, "glyphs": glyphs, "vertices": vertices}),
    );
    provenance::write_sidecar(&[out], payload)?;
    Ok(())
}

fn report(points: Option<&Path>) -> Result<()> {
    if let Some(path) = points {
        let df = table::summarize(path)?;
        tracing::info!(contours = df.height(), path = %path.display(), "points_summary");
        println!("{df}");
        return Ok(());
    }
    let obj = json!({
        "code_rev": provenance::current_git_rev(),
        "glyphmesh_version": glyphmesh::VERSION,
        "params": {},
        "outputs": []
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use records::GlyphMeshRecord;
    use tempfile::tempdir;

    fn run_args(input: PathBuf, out: PathBuf, kind: KindArg) -> RunArgs {
        RunArgs {
            input,
            out,
            kind,
            outset: 0.0,
            depth: 5.0,
            front_outset: 1.0,
            back_outset: 1.0,
            fill_rule: None,
            points: None,
        }
    }

    #[test]
    fn command_line_is_consistent() {
        Cmd::command().debug_assert();
        let cmd = Cmd::try_parse_from([
            "glyphmesh", "run", "--input", "a.json", "--out", "b.json", "--kind", "extrude",
            "--fill-rule", "evenodd",
        ])
        .unwrap();
        let Action::Run(args) = cmd.action else {
            panic!("expected run");
        };
        assert_eq!(args.kind, KindArg::Extrude);
        assert_eq!(args.fill_rule, Some(FillRuleRecord::EvenOdd));
    }

    #[test]
    fn demo_then_extrude_end_to_end() {
        let dir = tempdir().unwrap();
        let font = dir.path().join("in/font.json");
        demo(9, 3, 10, &font).unwrap();
        assert!(dir.path().join("in/font.provenance.json").exists());

        let out = dir.path().join("out/mesh.json");
        let mut args = run_args(font, out.clone(), KindArg::Extrude);
        args.points = Some(dir.path().join("out/points.csv"));
        run(&args).unwrap();

        let doc: MeshFile = serde_json::from_slice(&fs::read(&out).unwrap()).unwrap();
        assert_eq!(doc.kind, "extrude");
        assert_eq!(doc.glyphs.len(), 3);
        for GlyphMeshRecord { batches, error, bounds, .. } in &doc.glyphs {
            assert!(error.is_none(), "{error:?}");
            assert!(batches.iter().any(|b| b.primitive == "triangle_strip"));
            let [lo, hi] = bounds.unwrap();
            assert_eq!((lo[2], hi[2]), (-5.0, 0.0));
        }
        assert!(dir.path().join("out/mesh.provenance.json").exists());
        report(Some(&dir.path().join("out/points.csv"))).unwrap();
    }

    #[test]
    fn bad_glyphs_are_reported_not_fatal() {
        let dir = tempdir().unwrap();
        let font = dir.path().join("font.json");
        fs::write(
            &font,
            r#"{"glyphs": [
                {"id": 1, "contours": [[{"x": 0, "y": 0}, {"x": 4, "y": 0}]]},
                {"id": 2, "contours": [[{"x": 0, "y": 0}, {"x": 4, "y": 0}, {"x": 0, "y": 4}]]}
            ]}"#,
        )
        .unwrap();
        let out = dir.path().join("mesh.json");
        run(&run_args(font, out.clone(), KindArg::Outline)).unwrap();
        let doc: MeshFile = serde_json::from_slice(&fs::read(&out).unwrap()).unwrap();
        assert!(doc.glyphs[0].error.as_deref().unwrap().starts_with("degenerate"));
        assert_eq!(doc.glyphs[1].batches[0].primitive, "line_loop");
    }

    #[test]
    fn empty_input_is_an_error() {
        let dir = tempdir().unwrap();
        let font = dir.path().join("font.json");
        fs::write(&font, r#"{"glyphs": []}"#).unwrap();
        let args = run_args(font, dir.path().join("mesh.json"), KindArg::Polygon);
        assert!(run(&args).is_err());
    }
}
