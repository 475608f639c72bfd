//! Entry point: logging, command-line flags, then hand off to the platform loop.

use std::path::PathBuf;

use anyhow::Result;
use viewer::{DEFAULT_MODEL_PATH, InteractionMode, ViewerConfig};

const USAGE: &str = "\
Usage: modelview [--model=PATH] [--mode=parallax|orbit] [--decoder-path=URL]
                 [--gpu-backend=auto|vulkan|dx12|metal|gl] [--size=WxH]
                 [--width=N] [--height=N] [--show-fps[=on|off]]

The default model is Draco-compressed and Draco decoding is not supported,
so it always fails to load. Pass --model with an uncompressed .glb/.gltf.";

fn parse_backend(val: &str) -> wgpu::Backends {
    // Accept: auto|vulkan|dx12|metal|gl
    match val.to_ascii_lowercase().as_str() {
        "auto" => wgpu::Backends::all(),
        "vulkan" | "vk" => wgpu::Backends::VULKAN,
        "dx12" | "d3d12" => wgpu::Backends::DX12,
        "metal" | "mtl" => wgpu::Backends::METAL,
        "gl" | "opengl" | "gles" => wgpu::Backends::GL,
        other => {
            log::warn!("Unknown backend '{}', falling back to auto.", other);
            wgpu::Backends::all()
        }
    }
}

fn parse_switch(val: &str) -> bool {
    matches!(val.to_ascii_lowercase().as_str(), "1" | "true" | "on" | "yes")
}

#[derive(Debug)]
struct Args {
    help: bool,
    backends: wgpu::Backends,
    show_fps: bool,
    width: u32,
    height: u32,
    config: ViewerConfig,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Args {
    let mut help = false;
    let mut backends = wgpu::Backends::all();
    let mut show_fps = false;
    let mut w: Option<u32> = None;
    let mut h: Option<u32> = None;
    let mut mode = InteractionMode::Parallax;
    let mut model: Option<PathBuf> = None;
    let mut decoder_path: Option<String> = None;

    for arg in args {
        if arg == "--help" || arg == "-h" {
            help = true;
        } else if let Some(v) = arg.strip_prefix("--gpu-backend=") {
            backends = parse_backend(v);
        } else if arg == "--show-fps" {
            show_fps = true;
        } else if let Some(v) = arg.strip_prefix("--show-fps=") {
            show_fps = parse_switch(v);
        } else if let Some(v) = arg.strip_prefix("--size=") {
            if let Some((sw, sh)) = v.split_once('x').or_else(|| v.split_once('X')) {
                if let (Ok(pw), Ok(ph)) = (sw.parse::<u32>(), sh.parse::<u32>()) {
                    w = Some(pw);
                    h = Some(ph);
                }
            }
        } else if let Some(v) = arg.strip_prefix("--width=") {
            w = v.parse().ok().or(w);
        } else if let Some(v) = arg.strip_prefix("--height=") {
            h = v.parse().ok().or(h);
        } else if let Some(v) = arg.strip_prefix("--mode=") {
            match v.parse() {
                Ok(m) => mode = m,
                Err(e) => log::warn!("{e}; using {mode}"),
            }
        } else if let Some(v) = arg.strip_prefix("--model=") {
            model = Some(PathBuf::from(v));
        } else if let Some(v) = arg.strip_prefix("--decoder-path=") {
            decoder_path = Some(v.to_string());
        } else if arg.starts_with("--") {
            log::warn!("Ignoring unknown flag '{arg}'");
        }
    }

    let mut config = ViewerConfig::for_mode(mode);
    if let Some(model) = model {
        config.model_path = model;
    }
    if let Some(decoder_path) = decoder_path {
        config.decoder_path = decoder_path;
    }

    Args {
        help,
        backends,
        show_fps,
        width: w.unwrap_or(1280).max(1),
        height: h.unwrap_or(720).max(1),
        config,
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args(std::env::args().skip(1));
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }
    if args.config.model_path.as_os_str() == DEFAULT_MODEL_PATH {
        log::warn!(
            "Using the Draco-compressed default model {DEFAULT_MODEL_PATH}; pass --model=PATH with an uncompressed asset"
        );
    }
    log::info!(
        "Starting modelview. Backend: {:?}, mode={}, model={}, show_fps={}, window_size={}x{}",
        args.backends,
        args.config.interaction,
        args.config.model_path.display(),
        args.show_fps,
        args.width,
        args.height
    );

    platform::run(platform::RunOptions {
        backends: args.backends,
        show_fps: args.show_fps,
        width: args.width,
        height: args.height,
        config: args.config,
    })?;

    log::info!("Graceful shutdown. Bye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        parse_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn defaults_to_parallax_preset() {
        let a = parse(&[]);
        assert_eq!(a.config, ViewerConfig::parallax());
        assert_eq!((a.width, a.height), (1280, 720));
        assert!(!a.show_fps);
        assert!(!a.help);
        assert_eq!(a.backends, wgpu::Backends::all());
    }

    #[test]
    fn help_flag_explains_default_model() {
        assert!(parse(&["--help"]).help);
        assert!(parse(&["-h", "--mode=orbit"]).help);
        assert!(USAGE.contains("--model="));
        assert!(USAGE.contains("Draco"));
    }

    #[test]
    fn flags_override_preset() {
        let a = parse(&[
            "--mode=orbit",
            "--model=assets/cat.glb",
            "--decoder-path=/opt/draco/",
            "--size=800x600",
            "--height=500",
            "--show-fps=on",
            "--gpu-backend=vk",
        ]);
        assert_eq!(a.config.interaction, InteractionMode::Orbit);
        assert!(a.config.status.report_progress);
        assert_eq!(a.config.model_path, PathBuf::from("assets/cat.glb"));
        assert_eq!(a.config.decoder_path, "/opt/draco/");
        assert_eq!((a.width, a.height), (800, 500));
        assert!(a.show_fps);
        assert_eq!(a.backends, wgpu::Backends::VULKAN);
    }

    #[test]
    fn bad_values_fall_back() {
        let a = parse(&["--mode=fly", "--size=huge", "--width=0", "--gpu-backend=glide"]);
        assert_eq!(a.config.interaction, InteractionMode::Parallax);
        assert_eq!((a.width, a.height), (1, 720));
        assert_eq!(a.backends, wgpu::Backends::all());
    }
}
