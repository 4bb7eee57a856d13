use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use gfxmath::{
    boxes_intersect, circles_overlap, combine_all, hsb_to_rgb, pack_unorm4x8, resolve_overlap,
    rotation, scale, transform_direction, transform_point, translate, unpack_unorm4x8, Box2,
    Circle,
};
use glam::{Mat4, Vec2, Vec4};
use serde::Serialize;
use texconfig::TexkitConfig;
use texformat::{upload_image, PixelLayout, StorageFormat, TextureUpload, TextureUploader};
use tracing_subscriber::EnvFilter;

use crate::cli::{
    ColorArgs, Command, ConfigAction, HsbArgs, InspectArgs, OverlapShape, PackArgs,
    TransformArgs, TransformStep, UnpackArgs,
};
use crate::paths::AppPaths;

pub fn initialise_tracing() {
    let default_filter = "warn,texkit=info,texformat=info,texconfig=info";
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Global options shared by every subcommand.
pub struct Session {
    pub json: bool,
    pub config: Option<PathBuf>,
}

impl Session {
    fn load_config(&self) -> Result<TexkitConfig> {
        let paths = AppPaths::discover(self.config.as_deref())?;
        let path = paths.config_file();
        // An explicitly named file has to exist.
        if self.config.is_some() {
            return TexkitConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()));
        }
        TexkitConfig::load_or_default(path)
            .with_context(|| format!("failed to load config {}", path.display()))
    }

    fn emit<T: Serialize + fmt::Display>(&self, report: &T) -> Result<()> {
        if self.json {
            let rendered =
                serde_json::to_string_pretty(report).context("failed to serialise report")?;
            println!("{rendered}");
        } else {
            print!("{report}");
        }
        Ok(())
    }
}

pub fn run(session: &Session, command: Command) -> Result<()> {
    match command {
        Command::Inspect(args) => run_inspect(session, args),
        Command::Color(args) => run_color(session, args),
        Command::Hsb(args) => run_hsb(session, args),
        Command::Pack(args) => run_pack(session, args),
        Command::Unpack(args) => run_unpack(session, args),
        Command::Transform(args) => run_transform(session, args),
        Command::Overlap(overlap) => run_overlap(session, overlap.shape),
        Command::Config(config) => match config.action {
            ConfigAction::Where => run_config_where(session),
        },
    }
}

#[derive(Debug, Serialize)]
struct InspectReport {
    path: PathBuf,
    width: u32,
    height: u32,
    source_color: String,
    channels: u8,
    layout: PixelLayout,
    format: StorageFormat,
    gl_format: u32,
    gl_internal_format: u32,
    gl_type: u32,
    flipped: bool,
    bytes: usize,
    first_texel: Option<u32>,
    #[cfg(feature = "wgpu")]
    wgpu_format: Option<String>,
}

impl fmt::Display for InspectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "image:    {}", self.path.display())?;
        writeln!(
            f,
            "size:     {}x{} ({})",
            self.width, self.height, self.source_color
        )?;
        writeln!(f, "channels: {}", self.channels)?;
        writeln!(f, "layout:   {} (0x{:04X})", self.layout, self.gl_format)?;
        writeln!(
            f,
            "format:   {} (0x{:04X}, type 0x{:04X})",
            self.format, self.gl_internal_format, self.gl_type
        )?;
        writeln!(f, "flipped:  {}", self.flipped)?;
        writeln!(f, "bytes:    {}", self.bytes)?;
        match self.first_texel {
            Some(packed) => writeln!(f, "texel 0:  {packed:#010x}")?,
            None => writeln!(f, "texel 0:  none")?,
        }
        #[cfg(feature = "wgpu")]
        match &self.wgpu_format {
            Some(format) => writeln!(f, "wgpu:     {format}")?,
            None => writeln!(f, "wgpu:     none (expand to rgba first)")?,
        }
        Ok(())
    }
}

/// Stands in for a graphics driver: keeps what a real upload would hand over.
#[derive(Default)]
struct ReportingUploader {
    first_texel: Option<u32>,
    bytes: usize,
}

impl TextureUploader for ReportingUploader {
    type Error = anyhow::Error;

    fn upload(&mut self, upload: &TextureUpload) -> Result<(), Self::Error> {
        self.first_texel = upload
            .texel(0, 0)
            .map(|texel| pack_unorm4x8(Vec4::from_array(texel)));
        self.bytes = upload.bytes.len();
        tracing::debug!(
            width = upload.width,
            height = upload.height,
            format = %upload.format,
            bytes = self.bytes,
            "received texture upload"
        );
        Ok(())
    }
}

fn run_inspect(session: &Session, args: InspectArgs) -> Result<()> {
    let config = session.load_config()?;
    let options = texformat::UploadOptions {
        prefer_float: args.float || config.upload.prefer_float,
        flip_vertical: !args.no_flip && config.upload.flip_vertical,
    };

    let image = image::open(&args.image)
        .with_context(|| format!("failed to decode image {}", args.image.display()))?;
    let mut uploader = ReportingUploader::default();
    let upload = upload_image(&mut uploader, &image, &options)
        .with_context(|| format!("cannot upload {}", args.image.display()))?;

    tracing::info!(
        path = %args.image.display(),
        format = %upload.format,
        "inspected image"
    );

    let report = InspectReport {
        path: args.image,
        width: upload.width,
        height: upload.height,
        source_color: format!("{:?}", image.color()),
        channels: upload.channel_count(),
        layout: upload.layout,
        format: upload.format,
        gl_format: upload.layout.gl_enum(),
        gl_internal_format: upload.format.gl_enum(),
        gl_type: upload.format.gl_pixel_type(),
        flipped: options.flip_vertical,
        bytes: uploader.bytes,
        first_texel: uploader.first_texel,
        #[cfg(feature = "wgpu")]
        wgpu_format: upload.format.wgpu_format(false).map(|format| format!("{format:?}")),
    };
    session.emit(&report)
}

#[derive(Debug, Serialize)]
struct ColorEntry {
    input: String,
    rgba: [f32; 4],
    hex: String,
    packed: u32,
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
struct ColorReport(Vec<ColorEntry>);

impl fmt::Display for ColorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.0 {
            let [r, g, b, a] = entry.rgba;
            writeln!(
                f,
                "{}: rgba({r:.4}, {g:.4}, {b:.4}, {a:.4}) {} {:#010x}",
                entry.input, entry.hex, entry.packed
            )?;
        }
        Ok(())
    }
}

fn run_color(session: &Session, args: ColorArgs) -> Result<()> {
    let config = session.load_config()?;
    let entries = args
        .values
        .into_iter()
        .map(|input| -> Result<ColorEntry> {
            let color = config
                .resolve_color(&input)
                .with_context(|| format!("cannot resolve color '{input}'"))?;
            Ok(ColorEntry {
                rgba: Vec4::from(color).to_array(),
                hex: color.to_hex(),
                packed: color.to_packed(),
                input,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    session.emit(&ColorReport(entries))
}

#[derive(Debug, Serialize)]
struct HsbReport {
    hue: f32,
    saturation: f32,
    brightness: f32,
    rgb: [f32; 3],
}

impl fmt::Display for HsbReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.rgb;
        writeln!(f, "rgb({r:.4}, {g:.4}, {b:.4})")
    }
}

fn run_hsb(session: &Session, args: HsbArgs) -> Result<()> {
    let (r, g, b) = hsb_to_rgb(args.hue, args.saturation, args.brightness);
    session.emit(&HsbReport {
        hue: args.hue,
        saturation: args.saturation,
        brightness: args.brightness,
        rgb: [r, g, b],
    })
}

#[derive(Debug, Serialize)]
struct PackedReport {
    rgba: [f32; 4],
    packed: u32,
}

impl fmt::Display for PackedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.rgba;
        writeln!(f, "packed: {} ({:#010x})", self.packed, self.packed)?;
        writeln!(f, "rgba:   ({r:.4}, {g:.4}, {b:.4}, {a:.4})")
    }
}

fn run_pack(session: &Session, args: PackArgs) -> Result<()> {
    let input = Vec4::new(args.r, args.g, args.b, args.a);
    let packed = pack_unorm4x8(input);
    session.emit(&PackedReport {
        // What the packed value decodes to, after clamping and rounding.
        rgba: unpack_unorm4x8(packed).to_array(),
        packed,
    })
}

fn run_unpack(session: &Session, args: UnpackArgs) -> Result<()> {
    session.emit(&PackedReport {
        rgba: unpack_unorm4x8(args.value).to_array(),
        packed: args.value,
    })
}

#[derive(Debug, Serialize)]
struct TransformReport {
    steps: Vec<String>,
    input: Vec2,
    point: Vec2,
    direction: Vec2,
    matrix: [f32; 16],
}

impl fmt::Display for TransformReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            writeln!(f, "steps:     identity")?;
        } else {
            writeln!(f, "steps:     {}", self.steps.join(" -> "))?;
        }
        writeln!(f, "point:     {} -> {}", self.input, self.point)?;
        writeln!(f, "direction: {} -> {}", self.input, self.direction)
    }
}

fn run_transform(session: &Session, args: TransformArgs) -> Result<()> {
    let mut steps = Vec::with_capacity(args.steps.len());
    let mut transforms: Vec<Mat4> = Vec::with_capacity(args.steps.len());

    for step in &args.steps {
        let (label, matrix) = match *step {
            TransformStep::Rotate(degrees) => {
                (format!("rotate {degrees}"), rotation(degrees.to_radians()))
            }
            TransformStep::Scale(factors) => (
                format!("scale {},{}", factors.x, factors.y),
                scale(factors.x, factors.y),
            ),
            TransformStep::Translate(offset) => (
                format!("translate {},{}", offset.x, offset.y),
                translate(offset.x, offset.y),
            ),
        };
        steps.push(label);
        transforms.push(matrix);
    }

    let combined = combine_all(&transforms);
    tracing::debug!(steps = steps.len(), "combined transforms");

    session.emit(&TransformReport {
        steps,
        input: args.point,
        point: transform_point(args.point, combined),
        direction: transform_direction(args.point, combined),
        matrix: combined.to_cols_array(),
    })
}

#[derive(Debug, Serialize)]
struct BoxOverlapReport {
    a: Box2,
    b: Box2,
    intersects: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    resolved: Option<Box2>,
}

impl fmt::Display for BoxOverlapReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "intersects: {}", self.intersects)?;
        match self.resolved {
            Some(resolved) => writeln!(
                f,
                "resolved:   min {} max {}",
                resolved.min, resolved.max
            ),
            None => writeln!(f, "resolved:   unchanged"),
        }
    }
}

#[derive(Debug, Serialize)]
struct CircleOverlapReport {
    a: Circle,
    b: Circle,
    overlaps: bool,
}

impl fmt::Display for CircleOverlapReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "overlaps: {}", self.overlaps)
    }
}

fn run_overlap(session: &Session, shape: OverlapShape) -> Result<()> {
    match shape {
        OverlapShape::Box { a, b } => {
            let intersects = boxes_intersect(a, b);
            let resolved = intersects.then(|| resolve_overlap(a, b));
            session.emit(&BoxOverlapReport {
                a,
                b,
                intersects,
                resolved,
            })
        }
        OverlapShape::Circle { a, b } => session.emit(&CircleOverlapReport {
            a,
            b,
            overlaps: circles_overlap(a, b),
        }),
    }
}

#[derive(Debug, Serialize)]
struct ConfigWhereReport {
    config_dir: PathBuf,
    config_file: PathBuf,
    exists: bool,
}

impl ConfigWhereReport {
    fn from_paths(paths: &AppPaths) -> Self {
        Self {
            config_dir: paths.config_dir().to_path_buf(),
            config_file: paths.config_file().to_path_buf(),
            exists: paths.config_file().exists(),
        }
    }
}

impl fmt::Display for ConfigWhereReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Configuration:")?;
        writeln!(f, "  dir:  {}", self.config_dir.display())?;
        let state = if self.exists { "" } else { " (missing; defaults apply)" };
        writeln!(f, "  file: {}{state}", self.config_file.display())
    }
}

fn run_config_where(session: &Session) -> Result<()> {
    let paths = AppPaths::discover(session.config.as_deref())?;
    session.emit(&ConfigWhereReport::from_paths(&paths))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgba, RgbaImage};
    use texformat::UploadOptions;

    #[test]
    fn reporting_uploader_packs_first_texel() {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([255, 0, 128, 255])));
        let mut uploader = ReportingUploader::default();
        let upload = upload_image(&mut uploader, &image, &UploadOptions::default()).unwrap();
        assert_eq!(upload.format, StorageFormat::Rgba8);
        assert_eq!(uploader.bytes, 16);
        assert_eq!(uploader.first_texel, Some(0xff80_00ff));
    }

    #[test]
    fn color_report_lists_every_entry() {
        let report = ColorReport(vec![ColorEntry {
            input: "red".into(),
            rgba: [1.0, 0.0, 0.0, 1.0],
            hex: "#FF0000FF".into(),
            packed: 0xff00_00ff,
        }]);
        let text = report.to_string();
        assert!(text.starts_with("red: rgba(1.0000, 0.0000, 0.0000, 1.0000)"));
        assert!(text.contains("0xff0000ff"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json[0]["hex"], "#FF0000FF");
    }

    #[test]
    fn box_report_omits_resolution_without_intersection() {
        let report = BoxOverlapReport {
            a: Box2::new(Vec2::ZERO, Vec2::ONE),
            b: Box2::new(Vec2::splat(2.0), Vec2::splat(3.0)),
            intersects: false,
            resolved: None,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("resolved").is_none());
        assert!(report.to_string().contains("unchanged"));
    }
}
