//! Versioned plain-text level files.
//!
//! A file starts with an integer version tag that selects the reader. Each
//! version's layout is frozen once shipped; a new layout gets a new tag and a
//! new reader/writer pair, and old readers stay for loading old files.
//!
//! Version 100 is whitespace-delimited, one record per line:
//!
//! ```text
//! 100
//! px py  draw_w draw_h  col_w col_h  r g b a
//! <box count>
//! x y  w h  r g b a  u v uw uh  angle  texture  dynamic fixed_rotation
//! <light count>
//! x y  size  r g b a
//! ```
//!
//! Texture paths therefore cannot contain whitespace.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::SplitWhitespace;

use ben_core::ColorRGBA8;
use glam::{Vec2, Vec4};

use crate::entities::{BoxDef, Light, PlayerDef};
use crate::level::LevelData;

pub const TEXT_VERSION_0: i32 = 100;

pub fn save_as_text(path: &Path, level: &LevelData) -> Result<(), String> {
    let text = serialize_text(level)?;
    write_text_atomic(path, &text).map_err(|e| {
        let msg = format!("Failed to write level file {}: {e}", path.display());
        log::error!("{msg}");
        msg
    })?;
    log::info!(
        "Saved level to {} ({} boxes, {} lights)",
        path.display(),
        level.boxes.len(),
        level.lights.len()
    );
    Ok(())
}

pub fn load_from_text(path: &Path) -> Result<LevelData, String> {
    let raw = fs::read_to_string(path).map_err(|e| {
        let msg = format!("Failed to read level file {}: {e}", path.display());
        log::error!("{msg}");
        msg
    })?;
    let level = parse_text(&raw).map_err(|e| {
        let msg = format!("Failed to load level file {}: {e}", path.display());
        log::error!("{msg}");
        msg
    })?;
    log::info!(
        "Loaded level from {} ({} boxes, {} lights)",
        path.display(),
        level.boxes.len(),
        level.lights.len()
    );
    Ok(level)
}

/// Render `level` in the latest format.
pub fn serialize_text(level: &LevelData) -> Result<String, String> {
    write_v0(level)
}

pub fn parse_text(text: &str) -> Result<LevelData, String> {
    let mut fields = Fields::new(text);
    let version: i32 = fields.parse("version")?;
    match version {
        TEXT_VERSION_0 => read_v0(&mut fields),
        other => Err(format!("Unknown level format version {other}")),
    }
}

fn write_v0(level: &LevelData) -> Result<String, String> {
    for def in &level.boxes {
        validate_texture_path(&def.texture)?;
    }

    // Writing to a String cannot fail.
    let mut out = String::new();
    let p = &level.player;
    let _ = writeln!(out, "{TEXT_VERSION_0}");
    let _ = writeln!(
        out,
        "{} {} {} {} {} {} {}",
        p.position.x,
        p.position.y,
        p.draw_dims.x,
        p.draw_dims.y,
        p.collision_dims.x,
        p.collision_dims.y,
        color_fields(p.color)
    );

    let _ = writeln!(out, "{}", level.boxes.len());
    for b in &level.boxes {
        let _ = writeln!(
            out,
            "{} {} {} {} {} {} {} {} {} {} {} {} {}",
            b.position.x,
            b.position.y,
            b.dimensions.x,
            b.dimensions.y,
            color_fields(b.color),
            b.uv_rect.x,
            b.uv_rect.y,
            b.uv_rect.z,
            b.uv_rect.w,
            b.angle,
            b.texture,
            b.dynamic as u8,
            b.fixed_rotation as u8
        );
    }

    let _ = writeln!(out, "{}", level.lights.len());
    for l in &level.lights {
        let _ = writeln!(
            out,
            "{} {} {} {}",
            l.position.x,
            l.position.y,
            l.size,
            color_fields(l.color)
        );
    }
    Ok(out)
}

fn read_v0(fields: &mut Fields) -> Result<LevelData, String> {
    let player = PlayerDef {
        position: fields.vec2("player position")?,
        draw_dims: fields.vec2("player draw dims")?,
        collision_dims: fields.vec2("player collision dims")?,
        color: fields.color("player color")?,
    };

    let box_count: usize = fields.parse("box count")?;
    let mut boxes = Vec::with_capacity(box_count.min(4096));
    for _ in 0..box_count {
        boxes.push(BoxDef {
            position: fields.vec2("box position")?,
            dimensions: fields.vec2("box dimensions")?,
            color: fields.color("box color")?,
            uv_rect: fields.vec4("box uv rect")?,
            angle: fields.parse("box angle")?,
            texture: fields.next("box texture")?.to_string(),
            dynamic: fields.flag("box dynamic flag")?,
            fixed_rotation: fields.flag("box fixed rotation flag")?,
        });
    }

    let light_count: usize = fields.parse("light count")?;
    let mut lights = Vec::with_capacity(light_count.min(4096));
    for _ in 0..light_count {
        let position = fields.vec2("light position")?;
        let size = fields.parse("light size")?;
        let color = fields.color("light color")?;
        lights.push(Light::new(position, size, color));
    }

    Ok(LevelData {
        player,
        boxes,
        lights,
    })
}

fn color_fields(c: ColorRGBA8) -> String {
    format!("{} {} {} {}", c.r, c.g, c.b, c.a)
}

fn validate_texture_path(texture: &str) -> Result<(), String> {
    if texture.is_empty() {
        return Err("Box texture path is empty".to_string());
    }
    if texture.chars().any(char::is_whitespace) {
        return Err(format!(
            "Box texture path '{texture}' contains whitespace and cannot be saved"
        ));
    }
    Ok(())
}

/// Whitespace-delimited field reader with named errors.
struct Fields<'a> {
    tokens: SplitWhitespace<'a>,
}

impl<'a> Fields<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            tokens: text.split_whitespace(),
        }
    }

    fn next(&mut self, what: &str) -> Result<&'a str, String> {
        self.tokens
            .next()
            .ok_or_else(|| format!("Unexpected end of data while reading {what}"))
    }

    fn parse<T: std::str::FromStr>(&mut self, what: &str) -> Result<T, String> {
        let token = self.next(what)?;
        token
            .parse()
            .map_err(|_| format!("Invalid {what} '{token}'"))
    }

    fn vec2(&mut self, what: &str) -> Result<Vec2, String> {
        Ok(Vec2::new(self.parse(what)?, self.parse(what)?))
    }

    fn vec4(&mut self, what: &str) -> Result<Vec4, String> {
        Ok(Vec4::new(
            self.parse(what)?,
            self.parse(what)?,
            self.parse(what)?,
            self.parse(what)?,
        ))
    }

    fn color(&mut self, what: &str) -> Result<ColorRGBA8, String> {
        Ok(ColorRGBA8::new(
            self.parse(what)?,
            self.parse(what)?,
            self.parse(what)?,
            self.parse(what)?,
        ))
    }

    fn flag(&mut self, what: &str) -> Result<bool, String> {
        match self.next(what)? {
            "0" => Ok(false),
            "1" => Ok(true),
            other => Err(format!("Invalid {what} '{other}'")),
        }
    }
}

fn write_text_atomic(path: &Path, text: &str) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = temp_path_for(path);
    if let Err(error) = fs::write(&tmp_path, text) {
        let _ = fs::remove_file(&tmp_path);
        return Err(error);
    }

    if fs::rename(&tmp_path, path).is_ok() {
        return Ok(());
    }

    // Platforms where rename does not replace an existing file. The temp file
    // is kept on failure so the new text is never lost.
    match fs::remove_file(path) {
        Ok(_) => {}
        Err(error) if error.kind() == io::ErrorKind::NotFound => {}
        Err(error) => return Err(error),
    }
    fs::rename(&tmp_path, path)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("level");
    let tmp_name = format!("{file_name}.tmp");
    match path.parent() {
        Some(parent) => parent.join(tmp_name),
        None => PathBuf::from(tmp_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "ninja_level_test_{}_{}_{}",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn sample_level() -> LevelData {
        LevelData {
            player: PlayerDef {
                position: Vec2::new(0.0, 30.0),
                draw_dims: Vec2::new(2.0, 2.0),
                collision_dims: Vec2::new(1.0, 1.8),
                color: ColorRGBA8::new(255, 255, 255, 255),
            },
            boxes: vec![
                BoxDef {
                    position: Vec2::new(5.0, -10.0),
                    dimensions: Vec2::new(1.5, 1.5),
                    color: ColorRGBA8::new(200, 100, 50, 255),
                    texture: "Assets/bricks_top.png".to_string(),
                    uv_rect: Vec4::new(0.0, 0.0, 3.25, 0.75),
                    angle: 0.3,
                    dynamic: true,
                    fixed_rotation: false,
                },
                BoxDef {
                    position: Vec2::new(-2.125, 7.1),
                    dimensions: Vec2::new(10.0, 0.5),
                    color: ColorRGBA8::new(0, 0, 0, 50),
                    texture: "Assets/light_bricks.png".to_string(),
                    uv_rect: Vec4::new(0.0, 0.0, 1.0, 1.0),
                    angle: -1.0e-7,
                    dynamic: false,
                    fixed_rotation: true,
                },
            ],
            lights: vec![
                Light::new(Vec2::new(3.0, 3.0), 10.0, ColorRGBA8::new(255, 0, 255, 128)),
                Light::new(Vec2::new(-0.1, 0.2), 45.5, ColorRGBA8::new(1, 2, 3, 4)),
            ],
        }
    }

    #[test]
    fn save_then_load_reproduces_every_field() {
        let dir = temp_dir("round_trip");
        let path = dir.join("level.txt");
        let level = sample_level();
        save_as_text(&path, &level).expect("save should succeed");
        let loaded = load_from_text(&path).expect("load should succeed");
        assert_eq!(loaded, level);
        assert!(!dir.join("level.txt.tmp").exists());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn empty_collections_round_trip() {
        let mut level = sample_level();
        level.boxes.clear();
        level.lights.clear();
        let text = serialize_text(&level).expect("serialize");
        assert_eq!(parse_text(&text).expect("parse"), level);
    }

    #[test]
    fn text_layout_starts_with_version_tag() {
        let text = serialize_text(&sample_level()).expect("serialize");
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("100"));
        assert_eq!(lines.next(), Some("0 30 2 2 1 1.8 255 255 255 255"));
        assert_eq!(lines.next(), Some("2"));
        assert_eq!(
            lines.next(),
            Some("5 -10 1.5 1.5 200 100 50 255 0 0 3.25 0.75 0.3 Assets/bricks_top.png 1 0")
        );
    }

    #[test]
    fn unknown_version_fails() {
        let text = serialize_text(&sample_level()).expect("serialize");
        let text = text.replacen("100", "101", 1);
        let err = parse_text(&text).expect_err("version 101 is unknown");
        assert!(err.contains("Unknown level format version 101"));
    }

    #[test]
    fn failed_load_leaves_existing_level_untouched() {
        let dir = temp_dir("bad_version");
        fs::create_dir_all(&dir).expect("create temp dir");
        let path = dir.join("level.txt");
        fs::write(&path, "7\n").expect("write temp level");

        let mut current = sample_level();
        match load_from_text(&path) {
            Ok(loaded) => current = loaded,
            Err(err) => assert!(err.contains("version")),
        }
        assert_eq!(current, sample_level());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn truncated_file_names_the_missing_field() {
        let text = serialize_text(&sample_level()).expect("serialize");
        let cut: String = text.lines().take(3).collect::<Vec<_>>().join("\n");
        let err = parse_text(&cut).expect_err("boxes are missing");
        assert!(err.contains("box position"));
    }

    #[test]
    fn bad_flag_is_rejected() {
        let text = serialize_text(&sample_level()).expect("serialize");
        let broken = text.replacen("Assets/bricks_top.png 1 0", "Assets/bricks_top.png yes 0", 1);
        let err = parse_text(&broken).expect_err("flag must be 0 or 1");
        assert!(err.contains("box dynamic flag"));
    }

    #[test]
    fn whitespace_in_texture_path_is_refused() {
        let mut level = sample_level();
        level.boxes[0].texture = "My Textures/brick.png".to_string();
        let err = serialize_text(&level).expect_err("whitespace path");
        assert!(err.contains("whitespace"));

        level.boxes[0].texture.clear();
        let err = serialize_text(&level).expect_err("empty path");
        assert!(err.contains("empty"));
    }

    #[test]
    fn missing_file_reports_path() {
        let path = temp_dir("missing").join("nope.txt");
        let err = load_from_text(&path).expect_err("file does not exist");
        assert!(err.contains("Failed to read level file"));
        assert!(err.contains("nope.txt"));
    }

    #[test]
    fn save_replaces_existing_file() {
        let dir = temp_dir("replace");
        let path = dir.join("level.txt");
        let mut level = sample_level();
        save_as_text(&path, &level).expect("first save");
        level.lights.clear();
        save_as_text(&path, &level).expect("second save");
        assert_eq!(load_from_text(&path).expect("load").lights.len(), 0);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn failed_replace_keeps_existing_target_and_new_text() {
        let dir = temp_dir("blocked");
        let path = dir.join("level.txt");
        let marker = path.join("keep.txt");
        fs::create_dir_all(&path).expect("create blocking dir");
        fs::write(&marker, "old").expect("write marker");

        let err = save_as_text(&path, &sample_level()).expect_err("save must fail");
        assert!(err.contains("Failed to write level file"));
        assert_eq!(fs::read_to_string(&marker).expect("marker"), "old");
        let pending = fs::read_to_string(temp_path_for(&path)).expect("temp file kept");
        assert!(pending.starts_with("100"));
        let _ = fs::remove_dir_all(dir);
    }
}
