use glitch_contour::{
    render::{Renderer, TextureRandomness},
    PatternType, RenderParameters, Rgb,
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    std::fs::create_dir_all("out").unwrap();

    let mut renderer = Renderer::default();

    let params = RenderParameters::default();
    renderer
        .render(&params)
        .unwrap()
        .save_png("out/glitch-contour-default.png")
        .unwrap();

    // Same field, different styling: only the warp pass reruns.
    let turbulent = RenderParameters {
        turbulence: true,
        distortion_steps: 3,
        seed: 12.5,
        ..params.clone()
    };
    renderer
        .render(&turbulent)
        .unwrap()
        .save_png("out/glitch-contour-turbulent.png")
        .unwrap();

    let mut renderer = renderer.with_texture_randomness(TextureRandomness::Seeded(0));
    let inked = RenderParameters {
        pattern_type: PatternType::Checkerboard,
        band_width: 30.0,
        texture_mode: true,
        color1: Rgb::from_hex_or_black("#232328"),
        color2: Rgb::from_hex_or_black("#faf7f2"),
        ..params
    };
    let buffer = renderer.render(&inked).unwrap();
    let path = buffer.export_to_dir("out").unwrap();
    println!("wrote {}", path.display());
}
