use std::path::PathBuf;

use deckstrip::{Chapter, Deck, RenderOpts, RenderThreading, render_deck};

fn init_tracing() {
    // Tests share a process; only the first init wins.
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn sample_deck() -> Deck {
    Deck::new(vec![
        Chapter {
            name: "فصل اول".to_string(),
            slide_count: 3,
        },
        Chapter {
            name: "فصل دوم".to_string(),
            slide_count: 2,
        },
    ])
    .unwrap()
}

fn assert_pixel(img: &image::RgbaImage, x: u32, y: u32, rgb: [u8; 3]) {
    let px = img.get_pixel(x, y);
    assert_eq!(px[3], 255, "alpha at ({x},{y})");
    for c in 0..3 {
        assert!(
            px[c].abs_diff(rgb[c]) <= 2,
            "channel {c} at ({x},{y}): got {:?}, want {rgb:?}",
            px.0
        );
    }
}

#[test]
fn renders_full_deck_with_bullet_states() {
    init_tracing();
    let Some(font) = deckstrip::find_fallback_font() else {
        eprintln!("skipping: no system fonts available");
        return;
    };

    let dir = PathBuf::from("target").join("render_deck_smoke");
    std::fs::create_dir_all(&dir).unwrap();

    let deck = sample_deck();
    let opts = RenderOpts {
        out_dir: dir.clone(),
        font_path: Some(font),
        ..RenderOpts::default()
    };
    let stats = render_deck(&deck, &opts).unwrap();
    assert_eq!(stats.slides_total, 5);
    assert_eq!(stats.slides_written, 5);
    for i in 1..=5 {
        assert!(dir.join(format!("slide_{i}.png")).is_file(), "slide_{i}");
    }

    // Slide 1: first bullet of chapter 1 is current, everything else upcoming.
    // Bullet centers: chapter 1 at x 1770/1745/1720, chapter 2 at 1610/1585.
    let img = image::open(dir.join("slide_1.png")).unwrap().to_rgba8();
    assert_eq!((img.width(), img.height()), (1920, 57));
    assert_pixel(&img, 1770, 50, [0xfb, 0x6f, 0x92]);
    assert_pixel(&img, 1745, 50, [0x59, 0x74, 0x7b]);
    assert_pixel(&img, 1610, 50, [0x59, 0x74, 0x7b]);
    assert_eq!(img.get_pixel(5, 30)[3], 0, "background stays transparent");

    // Slide 4: all of chapter 1 visited, chapter 2 starts as current.
    let img = image::open(dir.join("slide_4.png")).unwrap().to_rgba8();
    assert_pixel(&img, 1770, 50, [0x33, 0x3f, 0x4c]);
    assert_pixel(&img, 1720, 50, [0x33, 0x3f, 0x4c]);
    assert_pixel(&img, 1610, 50, [0xfb, 0x6f, 0x92]);
    assert_pixel(&img, 1585, 50, [0x59, 0x74, 0x7b]);
}

#[test]
fn parallel_render_matches_sequential() {
    init_tracing();
    let Some(font) = deckstrip::find_fallback_font() else {
        eprintln!("skipping: no system fonts available");
        return;
    };

    let base = PathBuf::from("target").join("render_deck_parity");
    let seq_dir = base.join("seq");
    let par_dir = base.join("par");
    std::fs::create_dir_all(&seq_dir).unwrap();
    std::fs::create_dir_all(&par_dir).unwrap();

    let deck = sample_deck();
    let seq = RenderOpts {
        out_dir: seq_dir.clone(),
        font_path: Some(font.clone()),
        ..RenderOpts::default()
    };
    let par = RenderOpts {
        out_dir: par_dir.clone(),
        font_path: Some(font),
        threading: RenderThreading {
            parallel: true,
            threads: Some(2),
        },
        ..RenderOpts::default()
    };
    render_deck(&deck, &seq).unwrap();
    render_deck(&deck, &par).unwrap();

    for i in 1..=5 {
        let name = format!("slide_{i}.png");
        let a = std::fs::read(seq_dir.join(&name)).unwrap();
        let b = std::fs::read(par_dir.join(&name)).unwrap();
        assert_eq!(a, b, "{name} differs between sequential and parallel runs");
    }
}

#[test]
fn failed_write_aborts_with_the_offending_path() {
    init_tracing();
    let Some(font) = deckstrip::find_fallback_font() else {
        eprintln!("skipping: no system fonts available");
        return;
    };

    let dir = PathBuf::from("target").join("render_deck_io_failure");
    // Occupy the first output name with a directory so the write must fail.
    std::fs::create_dir_all(dir.join("slide_1.png")).unwrap();

    let deck = sample_deck();
    let opts = RenderOpts {
        out_dir: dir.clone(),
        font_path: Some(font),
        ..RenderOpts::default()
    };
    let err = render_deck(&deck, &opts).unwrap_err();
    assert!(
        err.to_string().contains("slide_1.png"),
        "error should carry the file path, got: {err}"
    );
    // The run aborts on the first failure; later slides are never produced.
    assert!(!dir.join("slide_2.png").exists());
}

#[test]
fn invalid_deck_is_rejected_before_any_io() {
    let deck = Deck { chapters: vec![] };
    let opts = RenderOpts {
        out_dir: PathBuf::from("target").join("render_deck_should_not_exist"),
        ..RenderOpts::default()
    };
    assert!(render_deck(&deck, &opts).is_err());
    assert!(!opts.out_dir.exists());
}
