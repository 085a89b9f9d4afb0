//! Flattened contour points as a polars table.
//!
//! Columns: glyph, contour, index, hole, x, y, outset_x, outset_y. Written as
//! Parquet for a `.parquet` path, CSV otherwise.

use anyhow::{Context, Result};
use glyphmesh::prelude::*;
use polars::prelude::*;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

/// One row per flattened point of every glyph; `outset` fills the outset columns.
pub fn points_frame(font: &BTreeMap<u32, GlyphSlot>, outset: f64) -> Result<DataFrame> {
    let mut glyph = Vec::new();
    let mut contour = Vec::new();
    let mut index = Vec::new();
    let mut hole = Vec::new();
    let (mut x, mut y, mut ox, mut oy) = (Vec::new(), Vec::new(), Vec::new(), Vec::new());
    for (&id, slot) in font {
        let v = Vectoriser::with_outsets(&slot.outline, outset, 0.0);
        for (c, cont) in v.contours().iter().enumerate() {
            for i in 0..cont.point_count() {
                let p = cont.point(i);
                let o = cont.front_point(i);
                glyph.push(i64::from(id));
                contour.push(c as i64);
                index.push(i as i64);
                hole.push(cont.is_hole());
                x.push(p.x);
                y.push(p.y);
                ox.push(o.x);
                oy.push(o.y);
            }
        }
    }
    let df = df!(
        "glyph" => glyph,
        "contour" => contour,
        "index" => index,
        "hole" => hole,
        "x" => x,
        "y" => y,
        "outset_x" => ox,
        "outset_y" => oy
    )?;
    Ok(df)
}

pub fn write_points(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    if is_parquet(path) {
        ParquetWriter::new(&mut file).finish(df)?;
    } else {
        CsvWriter::new(&mut file).include_header(true).finish(df)?;
    }
    Ok(())
}

/// Per-contour point count, nesting and bounding box of a points table.
pub fn summarize(path: &Path) -> Result<DataFrame> {
    let lf = if is_parquet(path) {
        LazyFrame::scan_parquet(path, ScanArgsParquet::default())?
    } else {
        LazyCsvReader::new(path)
            .with_infer_schema_length(Some(100))
            .finish()?
    };
    let df = lf
        .group_by_stable([col("glyph"), col("contour")])
        .agg([
            col("index").count().alias("points"),
            col("hole").first().alias("hole"),
            col("x").min().alias("x_min"),
            col("x").max().alias("x_max"),
            col("y").min().alias("y_min"),
            col("y").max().alias("y_max"),
        ])
        .collect()
        .with_context(|| format!("summarizing {}", path.display()))?;
    Ok(df)
}

fn is_parquet(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("parquet")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn font() -> BTreeMap<u32, GlyphSlot> {
        let outline = draw_outline_radial(RadialCfg::default(), ReplayToken { seed: 5, index: 0 });
        BTreeMap::from([(1, GlyphSlot::outline(outline, glyphmesh::Vec2::new(240.0, 0.0)))])
    }

    #[test]
    fn frame_has_a_row_per_flattened_point() {
        let font = font();
        let df = points_frame(&font, 2.0).unwrap();
        let v = Vectoriser::new(&font[&1].outline);
        assert_eq!(df.height(), v.point_count());
        assert_eq!(df.width(), 8);
    }

    #[test]
    fn csv_and_parquet_summaries_agree() {
        let dir = tempdir().unwrap();
        let mut df = points_frame(&font(), 0.0).unwrap();
        let csv = dir.path().join("points.csv");
        let parquet = dir.path().join("points.parquet");
        write_points(&mut df, &csv).unwrap();
        write_points(&mut df, &parquet).unwrap();
        let a = summarize(&csv).unwrap();
        let b = summarize(&parquet).unwrap();
        assert_eq!(a.height(), 2);
        assert_eq!(a.shape(), b.shape());
        let points = b.column("points").unwrap().u32().unwrap();
        let total: u32 = points.into_iter().flatten().sum();
        assert_eq!(total as usize, df.height());
    }
}
