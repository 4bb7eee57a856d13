use std::ffi::OsString;
use std::path::PathBuf;

use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use gfxmath::{Box2, Circle};
use glam::Vec2;

#[derive(Parser, Debug)]
#[command(
    name = "texkit",
    author,
    version,
    about = "Texture format, color and 2D transform toolbox"
)]
pub struct Cli {
    /// Print results as JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file; defaults to `TEXKIT_CONFIG` or the user config directory.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode an image and report the texture format it would be uploaded with.
    Inspect(InspectArgs),
    /// Resolve color names, palette entries or hex codes.
    Color(ColorArgs),
    /// Convert hue, saturation and brightness to RGB.
    #[command(allow_negative_numbers = true)]
    Hsb(HsbArgs),
    /// Pack four normalized channels into a `u32`.
    #[command(allow_negative_numbers = true)]
    Pack(PackArgs),
    /// Unpack a `u32` (decimal or `0x` hex) into four normalized channels.
    Unpack(UnpackArgs),
    /// Apply rotation, scale and translation to a point and a direction.
    #[command(allow_negative_numbers = true)]
    Transform(TransformArgs),
    /// Test boxes or circles for overlap.
    Overlap(OverlapCommand),
    /// Inspect configuration discovery.
    Config(ConfigCommand),
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Image file to decode (png, jpeg, bmp, gif).
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,

    /// Store channels as 32-bit floats.
    #[arg(long)]
    pub float: bool,

    /// Keep the image's top row first in memory.
    #[arg(long)]
    pub no_flip: bool,
}

#[derive(Parser, Debug)]
pub struct ColorArgs {
    /// Color names, palette names or hex codes (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`).
    #[arg(value_name = "VALUE", required = true)]
    pub values: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct HsbArgs {
    /// Hue; one full turn is 1.0.
    pub hue: f32,
    pub saturation: f32,
    pub brightness: f32,
}

#[derive(Parser, Debug)]
pub struct PackArgs {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

#[derive(Parser, Debug)]
pub struct UnpackArgs {
    #[arg(value_name = "U32", value_parser = parse_u32)]
    pub value: u32,
}

#[derive(Parser, Debug)]
pub struct TransformArgs {
    /// Rotation about the origin in degrees, counter-clockwise.
    #[arg(long, value_name = "DEGREES")]
    pub rotate: Option<f32>,

    /// Scale factors; a single value scales both axes.
    #[arg(long, value_name = "SX[,SY]", value_parser = parse_scale, allow_hyphen_values = true)]
    pub scale: Option<Vec2>,

    /// Translation offset.
    #[arg(long, value_name = "TX,TY", value_parser = parse_vec2, allow_hyphen_values = true)]
    pub translate: Option<Vec2>,

    /// Point (and direction) to transform.
    #[arg(value_name = "X,Y", value_parser = parse_vec2, allow_hyphen_values = true)]
    pub point: Vec2,

    /// The options above in the order they appeared on the command line.
    #[arg(skip)]
    pub steps: Vec<TransformStep>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformStep {
    Rotate(f32),
    Scale(Vec2),
    Translate(Vec2),
}

impl TransformArgs {
    fn order_steps(&mut self, matches: &ArgMatches) {
        let position = |id: &str| matches.index_of(id).unwrap_or(usize::MAX);

        let mut positioned = Vec::new();
        if let Some(degrees) = self.rotate {
            positioned.push((position("rotate"), TransformStep::Rotate(degrees)));
        }
        if let Some(factors) = self.scale {
            positioned.push((position("scale"), TransformStep::Scale(factors)));
        }
        if let Some(offset) = self.translate {
            positioned.push((position("translate"), TransformStep::Translate(offset)));
        }
        positioned.sort_by_key(|(index, _)| *index);

        self.steps = positioned.into_iter().map(|(_, step)| step).collect();
    }
}

#[derive(Parser, Debug)]
pub struct OverlapCommand {
    #[command(subcommand)]
    pub shape: OverlapShape,
}

#[derive(Subcommand, Debug)]
pub enum OverlapShape {
    /// Two boxes given as `x,y,width,height`; prints the intersection and the resolved box.
    #[command(allow_negative_numbers = true)]
    Box {
        #[arg(value_name = "X,Y,W,H", value_parser = parse_box, allow_hyphen_values = true)]
        a: Box2,
        #[arg(value_name = "X,Y,W,H", value_parser = parse_box, allow_hyphen_values = true)]
        b: Box2,
    },
    /// Two circles given as `x,y,radius`.
    #[command(allow_negative_numbers = true)]
    Circle {
        #[arg(value_name = "X,Y,R", value_parser = parse_circle, allow_hyphen_values = true)]
        a: Circle,
        #[arg(value_name = "X,Y,R", value_parser = parse_circle, allow_hyphen_values = true)]
        b: Circle,
    },
}

#[derive(Parser, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the resolved configuration directory and file.
    Where,
}

pub fn parse() -> Cli {
    try_parse_from(std::env::args_os()).unwrap_or_else(|err| err.exit())
}

/// Parses `args` and records the command-line order of transform options,
/// which the derived fields alone do not keep.
pub fn try_parse_from<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = Cli::command().try_get_matches_from(args)?;
    let mut cli = Cli::from_arg_matches(&matches)?;
    if let (Command::Transform(transform), Some(("transform", sub_matches))) =
        (&mut cli.command, matches.subcommand())
    {
        transform.order_steps(sub_matches);
    }
    Ok(cli)
}

/// Accepts decimal or `0x`-prefixed hexadecimal.
pub fn parse_u32(value: &str) -> Result<u32, String> {
    let trimmed = value.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => trimmed.parse(),
    };
    parsed.map_err(|err| format!("invalid u32 '{trimmed}': {err}"))
}

pub fn parse_vec2(value: &str) -> Result<Vec2, String> {
    let [x, y] = parse_floats::<2>(value)?;
    Ok(Vec2::new(x, y))
}

pub fn parse_scale(value: &str) -> Result<Vec2, String> {
    if value.contains(',') {
        parse_vec2(value)
    } else {
        let [factor] = parse_floats::<1>(value)?;
        Ok(Vec2::splat(factor))
    }
}

pub fn parse_box(value: &str) -> Result<Box2, String> {
    let [x, y, width, height] = parse_floats::<4>(value)?;
    if width < 0.0 || height < 0.0 {
        return Err(format!("box size must not be negative in '{value}'"));
    }
    Ok(Box2::from_min_size(
        Vec2::new(x, y),
        Vec2::new(width, height),
    ))
}

pub fn parse_circle(value: &str) -> Result<Circle, String> {
    let [x, y, radius] = parse_floats::<3>(value)?;
    if radius < 0.0 {
        return Err(format!("circle radius must not be negative in '{value}'"));
    }
    Ok(Circle::new(Vec2::new(x, y), radius))
}

fn parse_floats<const N: usize>(value: &str) -> Result<[f32; N], String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if parts.len() != N {
        return Err(format!(
            "expected {N} comma-separated numbers, got '{}'",
            value.trim()
        ));
    }

    let mut numbers = [0.0; N];
    for (slot, part) in numbers.iter_mut().zip(parts) {
        *slot = part
            .parse()
            .map_err(|_| format!("invalid number '{part}' in '{}'", value.trim()))?;
    }
    Ok(numbers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_and_hex_u32() {
        assert_eq!(parse_u32("4278190335"), Ok(0xff00_00ff));
        assert_eq!(parse_u32("0xff0000ff"), Ok(0xff00_00ff));
        assert_eq!(parse_u32(" 0XFF "), Ok(255));
        assert!(parse_u32("0x1_0000_0000").is_err());
        assert!(parse_u32("-1").is_err());
        assert!(parse_u32("").is_err());
    }

    #[test]
    fn parses_vectors_and_scales() {
        assert_eq!(parse_vec2("1.5, -2"), Ok(Vec2::new(1.5, -2.0)));
        assert!(parse_vec2("1").is_err());
        assert!(parse_vec2("1,2,3").is_err());
        assert!(parse_vec2("1,y").is_err());

        assert_eq!(parse_scale("2"), Ok(Vec2::splat(2.0)));
        assert_eq!(parse_scale("2,3"), Ok(Vec2::new(2.0, 3.0)));
    }

    #[test]
    fn parses_shapes() {
        let parsed = parse_box("0,0,2,1").unwrap();
        assert_eq!(parsed.min, Vec2::ZERO);
        assert_eq!(parsed.max, Vec2::new(2.0, 1.0));
        assert!(parse_box("0,0,-1,1").is_err());

        let circle = parse_circle("-1,2,0.5").unwrap();
        assert_eq!(circle.center, Vec2::new(-1.0, 2.0));
        assert_eq!(circle.radius, 0.5);
        assert!(parse_circle("0,0,-1").is_err());
    }

    #[test]
    fn cli_accepts_negative_numbers() {
        let cli = try_parse_from([
            "texkit",
            "transform",
            "--rotate",
            "-90",
            "--translate",
            "-1,2",
            "1,0",
        ])
        .unwrap();
        match cli.command {
            Command::Transform(args) => {
                assert_eq!(args.rotate, Some(-90.0));
                assert_eq!(args.translate, Some(Vec2::new(-1.0, 2.0)));
                assert_eq!(args.point, Vec2::new(1.0, 0.0));
                assert_eq!(args.scale, None);
            }
            other => panic!("unexpected command {other:?}"),
        }

        let cli = try_parse_from(["texkit", "--json", "hsb", "-0.25", "1", "1"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Command::Hsb(HsbArgs { hue, .. }) if hue == -0.25));
    }

    #[test]
    fn transform_steps_follow_command_line_order() {
        let cli = try_parse_from([
            "texkit",
            "transform",
            "--translate",
            "1,0",
            "--scale",
            "2",
            "--rotate",
            "90",
            "1,0",
        ])
        .unwrap();
        match cli.command {
            Command::Transform(args) => assert_eq!(
                args.steps,
                vec![
                    TransformStep::Translate(Vec2::new(1.0, 0.0)),
                    TransformStep::Scale(Vec2::splat(2.0)),
                    TransformStep::Rotate(90.0),
                ]
            ),
            other => panic!("unexpected command {other:?}"),
        }

        let cli = try_parse_from(["texkit", "transform", "0,0"]).unwrap();
        assert!(matches!(cli.command, Command::Transform(args) if args.steps.is_empty()));
    }

    #[test]
    fn color_requires_a_value() {
        assert!(try_parse_from(["texkit", "color"]).is_err());
    }
}
