use std::{
    f32::consts::PI,
    fs::{self, File},
    io::{BufWriter, Write},
};

use anyhow::{anyhow, Context, Result};
use raqote::*;
use serde::{Deserialize, Serialize};

use crate::{
    cli::McConfig,
    mc::MonteCarlo,
    particle::{IsParticle, Particles},
    properties::{PairClass, Properties},
    Prng,
};

pub struct XYZWriter {
    file: BufWriter<File>,
}

impl XYZWriter {
    pub fn new(p: &str) -> Result<Self> {
        let file = File::create(p).with_context(|| format!("creating {}", p))?;
        Ok(Self {
            file: BufWriter::new(file),
        })
    }

    pub fn write_xyz_frame(&mut self, mc: &MonteCarlo) -> Result<()> {
        writeln!(self.file, "{:?}\n", mc.particles().num_particles())?;
        for p in mc.particles().iter() {
            writeln!(
                self.file,
                "t{} {:?} {:?} 0",
                p.type_label(),
                p.pos().x(),
                p.pos().y()
            )?;
        }
        self.file.flush()?;
        Ok(())
    }
}

fn write_series(pathname: &str, values: &[f64]) -> Result<()> {
    let file = File::create(pathname).with_context(|| format!("creating {}", pathname))?;
    let mut w = BufWriter::new(file);
    for v in values {
        write!(w, "{} ", v)?;
    }
    w.flush()?;
    Ok(())
}

/// Energy and virial series plus every histogram, space separated
pub fn write_properties(properties: &Properties, config: &McConfig) -> Result<()> {
    write_series(&config.virials(), properties.virials())?;
    write_series(&config.energies(), properties.energies())?;

    for class in PairClass::EVERY {
        let hist = properties.histogram(class);
        write_series(&config.num_density(class), hist.radial())?;
        let flat: Vec<f64> = hist.planar().iter().flatten().copied().collect();
        write_series(&config.xy_num_density(class), &flat)?;
    }
    Ok(())
}

#[derive(Serialize, Deserialize)]
pub struct Snapshot {
    pub particles: Particles,
    pub rng: Prng,
}

pub fn write_snapshot(mc: &MonteCarlo, rng: &Prng, pathname: &str) -> Result<()> {
    let snapshot = Snapshot {
        particles: mc.particles().clone(),
        rng: rng.clone(),
    };
    let json = serde_json::to_string(&snapshot)?;
    fs::write(pathname, json).with_context(|| format!("writing {}", pathname))?;
    Ok(())
}

pub fn read_snapshot(pathname: &str) -> Result<Snapshot> {
    let contents =
        fs::read_to_string(pathname).with_context(|| format!("reading {}", pathname))?;
    Ok(serde_json::from_str(&contents)?)
}

fn rgba_solid(r: u8, g: u8, b: u8, a: u8) -> Source<'static> {
    Source::Solid(SolidSource { r, g, b, a })
}

fn rgba_white() -> Source<'static> {
    rgba_solid(0xff, 0xff, 0xff, 0xff)
}

fn rgba_blue() -> Source<'static> {
    rgba_solid(0x21, 0x5f, 0xf3, 0xff)
}

fn rgba_orange() -> Source<'static> {
    rgba_solid(0xf3, 0x70, 0x21, 0xff)
}

fn draw_white_background(dt: &mut DrawTarget, side: f32) {
    let mut pb = PathBuilder::new();
    pb.move_to(0.0, 0.0);
    pb.line_to(side, 0.0);
    pb.line_to(side, side);
    pb.line_to(0.0, side);
    pb.line_to(0.0, 0.0);
    let draw_path = pb.finish();
    dt.fill(&draw_path, &rgba_white(), &DrawOptions::new());
}

fn render_circle_at(x: f32, y: f32, radius: f32) -> Path {
    let mut pb = PathBuilder::new();
    pb.arc(x, y, radius, 0.0, 2.0 * PI);
    pb.close();
    pb.finish()
}

/// Discs coloured by type label: blue for parallel, orange for antiparallel
pub fn write_geometry_png(mc: &MonteCarlo, pathname: &str) -> Result<()> {
    // need to adjust from 0-centered to all positive coordinates
    let scale = 40.0;
    let side = mc.simbox().box_length() * scale;
    let offset = mc.simbox().max() * scale;
    let mut dt = DrawTarget::new(side.ceil() as i32, side.ceil() as i32);

    draw_white_background(&mut dt, side as f32);
    let draw_options = DrawOptions::new();
    for p in mc.particles().iter() {
        let x = (p.pos().x() * scale + offset) as f32;
        let y = (p.pos().y() * scale + offset) as f32;
        let radius = if p.radius() > 0.0 { p.radius() } else { 0.5 };
        let path = render_circle_at(x, y, (radius * scale) as f32);
        let source = if p.type_label() == 0 {
            rgba_blue()
        } else {
            rgba_orange()
        };
        dt.fill(&path, &source, &draw_options);
    }

    dt.write_png(pathname)
        .map_err(|e| anyhow!("writing {}: {:?}", pathname, e))
}

/// Radial pair counts for each pair class against reduced distance
pub fn write_rdf_png(properties: &Properties, pathname: &str) -> Result<()> {
    use plotters::prelude::*;

    let bin_width = properties.bin_width();
    let all = properties.histogram(PairClass::All).radial();
    let x_max = (all.len() as f64 * bin_width).max(bin_width);
    let y_max = all.iter().cloned().fold(1.0, f64::max);

    let root_area = BitMapBackend::new(pathname, (1000, 600)).into_drawing_area();
    root_area.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    let mut ctx = ChartBuilder::on(&root_area)
        .set_label_area_size(LabelAreaPosition::Left, 48)
        .set_label_area_size(LabelAreaPosition::Bottom, 32)
        .caption("Radial pair counts", ("sans-serif", 32))
        .build_cartesian_2d(0.0..x_max, 0.0..y_max)
        .map_err(|e| anyhow!("{:?}", e))?;
    ctx.configure_mesh()
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    let styles = [
        (PairClass::All, RGBColor(0, 0, 0)),
        (PairClass::Parallel, RGBColor(0x21, 0x5f, 0xf3)),
        (PairClass::Antiparallel, RGBColor(0xf3, 0x70, 0x21)),
    ];
    for (class, color) in styles {
        let line: Vec<(f64, f64)> = properties
            .histogram(class)
            .radial()
            .iter()
            .enumerate()
            .map(|(idx, count)| (idx as f64 * bin_width, *count))
            .collect();
        ctx.draw_series(LineSeries::new(line, color.stroke_width(2)))
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    root_area.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

fn try_delete(p: String) -> Result<()> {
    if std::path::Path::new(&p).is_file() {
        fs::remove_file(&p).with_context(|| format!("removing {}", p))?;
    }
    Ok(())
}

pub fn clear_out_files(config: &McConfig) -> Result<()> {
    try_delete(config.toml())?;
    try_delete(config.trajectory())?;
    try_delete(config.snapshot())?;
    try_delete(config.geometry())?;
    try_delete(config.rdf_plot())?;
    try_delete(config.energies())?;
    try_delete(config.virials())?;
    for class in PairClass::EVERY {
        try_delete(config.num_density(class))?;
        try_delete(config.xy_num_density(class))?;
    }
    Ok(())
}
