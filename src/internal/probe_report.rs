#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

//! Measures probe lengths of `ProbingTable` at increasing load factors and plots them.
//!
//! Every run fills a fresh table of `TABLE_SIZE` slots with random keys, then
//! removes a random half of them and inserts as many new keys, so the second
//! measurement walks past tombstones.

use plotters::prelude::*;
use quadtable::ProbingTable;
use rand::{Rng, seq::SliceRandom};

const TABLE_SIZE: usize = 1 << 16;
// Load factors from 0.05 to 0.70, below the growth threshold
const NUM_LOAD_FACTORS: usize = 14;
const MAX_KEY: u64 = 1 << 40;

const SERIES: [&str; 2] = ["Fresh table", "After churn"];

#[derive(Debug, Default, Clone, Copy)]
struct ProbeStats {
    average: f64,
    worst: usize,
    tombstones: usize,
    capacity: usize,
}

fn measure(table: &ProbingTable<u64, u64>, keys: &[u64]) -> ProbeStats {
    let lengths: Vec<usize> = keys.iter().filter_map(|key| table.probe_length(key)).collect();
    let total: usize = lengths.iter().sum();

    ProbeStats {
        average: if lengths.is_empty() { 0.0 } else { total as f64 / lengths.len() as f64 },
        worst: lengths.iter().copied().max().unwrap_or(0),
        tombstones: table.tombstones(),
        capacity: table.capacity(),
    }
}

fn random_keys(rng: &mut impl Rng, count: usize) -> Vec<u64> {
    (0..count).map(|_| rng.random_range(0..MAX_KEY)).collect()
}

fn run(rng: &mut impl Rng, n_keys: usize) -> Result<[ProbeStats; 2], Box<dyn std::error::Error>> {
    let mut table = ProbingTable::with_capacity(TABLE_SIZE)?;
    let mut keys = random_keys(rng, n_keys);
    for &key in &keys {
        table.insert(key, key)?;
    }
    let fresh = measure(&table, &keys);

    keys.shuffle(rng);
    let kept = keys.split_off(n_keys / 2);
    for key in &keys {
        table.remove(key);
    }
    let replacements = random_keys(rng, keys.len());
    for &key in &replacements {
        table.insert(key, key)?;
    }
    let live: Vec<u64> = kept.into_iter().chain(replacements).collect();
    let churned = measure(&table, &live);

    Ok([fresh, churned])
}

fn plot(
    path: &str,
    caption: &str,
    y_desc: &str,
    load_factors: &[f64],
    series: &[Vec<f64>; 2],
) -> Result<(), Box<dyn std::error::Error>> {
    let font_family = "sans-serif";
    let colors = [RGBColor(50, 90, 220), RGBColor(220, 50, 50)];
    let line_width = 2;
    let marker_size = 4;

    let root = BitMapBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_y = series.iter().flatten().fold(1.0_f64, |max, &y| max.max(y)) * 1.1;
    let max_x = load_factors.last().copied().unwrap_or(1.0) + 0.05;

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, (font_family, 35))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..max_x, 0.0..max_y)?;

    chart
        .configure_mesh()
        .x_desc("Load Factor")
        .y_desc(y_desc)
        .axis_desc_style((font_family, 16))
        .draw()?;

    for (index, name) in SERIES.iter().enumerate() {
        let color = colors[index];
        let line_style = ShapeStyle::from(&color).stroke_width(line_width);
        let points: Vec<(f64, f64)> =
            load_factors.iter().copied().zip(series[index].iter().copied()).collect();

        chart
            .draw_series(LineSeries::new(points.clone(), line_style))?
            .label(*name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));
        chart.draw_series(
            points.into_iter().map(|point| Circle::new(point, marker_size, color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    root.present()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let load_factors: Vec<f64> =
        (1..=NUM_LOAD_FACTORS).map(|i| 0.05 * i as f64).collect();

    let mut rng = rand::rng();
    let mut average: [Vec<f64>; 2] = Default::default();
    let mut worst: [Vec<f64>; 2] = Default::default();

    for &load in &load_factors {
        let n_keys = (TABLE_SIZE as f64 * load) as usize;
        let stats = run(&mut rng, n_keys)?;

        println!("Load factor {load:.2} ({n_keys} keys)");
        for (index, name) in SERIES.iter().enumerate() {
            let ProbeStats { average: avg, worst: max, tombstones, capacity } = stats[index];
            println!(
                "  {name}: Avg probes = {avg:.3}, Worst = {max}, Tombstones = {tombstones}, Capacity = {capacity}"
            );
            average[index].push(avg);
            worst[index].push(max as f64);
        }
    }

    plot(
        "probe_average.png",
        "Average Probe Length of Quadratic Probing",
        "Average probes per lookup",
        &load_factors,
        &average,
    )?;
    plot(
        "probe_worst.png",
        "Worst-Case Probe Length of Quadratic Probing",
        "Worst-case probes per lookup",
        &load_factors,
        &worst,
    )?;

    println!("Generated plot images: probe_average.png, probe_worst.png");

    Ok(())
}
