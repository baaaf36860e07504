use warpfield_starfield::{
    ConfigurationError, GeneratorKind, IndexedBuffer, PaletteSpec, Session, SessionParams,
    StarfieldError, build_palette, init_session,
};

#[test]
fn test_reference_session_succeeds() {
    let session = init_session(1152, 144, 8, 360).unwrap();
    assert_eq!(session.stars().len(), 1152);
}

#[test]
fn test_mismatched_star_count_fails() {
    let err = init_session(1000, 144, 8, 360).unwrap_err();
    assert!(
        matches!(
            err,
            StarfieldError::Configuration(ConfigurationError::StarCountMismatch {
                star_count: 1000,
                expected: 1152,
                ..
            })
        ),
        "unexpected error: {err}"
    );
}

#[test]
fn test_every_depth_equally_populated_after_init() {
    let session = init_session(1152, 144, 8, 360).unwrap();
    let mut per_depth = [0usize; 145];
    for star in session.stars() {
        per_depth[star.depth as usize] += 1;
    }
    assert!(per_depth[1..].iter().all(|&n| n == 8), "{per_depth:?}");
}

#[test]
fn test_expired_star_reseeded_by_active_generator() {
    let params = SessionParams {
        boost: false,
        speed: 1,
        ..SessionParams::default()
    };
    let mut session = Session::new(&params, &PaletteSpec::default(), 320, 200).unwrap();
    let before = session.stars()[0].clone();
    assert_eq!((before.depth, before.bucket), (1, 0));
    assert_eq!(session.active_generator(), GeneratorKind::Random);

    let mut buffer = IndexedBuffer::new(320, 200);
    session.advance_frame(&mut buffer).unwrap();

    let after = &session.stars()[0];
    assert_eq!(after.depth, 144);
    assert!(after.visible);
    assert_ne!(after.base, before.base);
    assert!((-32.0..32.0).contains(&after.base.x));
    assert!((-32.0..32.0).contains(&after.base.y));
}

#[test]
fn test_depth_and_bucket_invariants_over_a_long_run() {
    let mut session = init_session(1152, 144, 8, 30).unwrap();
    let buckets: Vec<i32> = session.stars().iter().map(|s| s.bucket).collect();
    let mut buffer = IndexedBuffer::new(320, 200);
    let ticker = session.tick_handle();

    for frame in 0..1000 {
        // Ticks outpace frames, as with a 60 Hz timer under a slower renderer.
        ticker.tick();
        if frame % 2 == 0 {
            ticker.tick();
        }
        buffer.clear(0);
        session.advance_frame(&mut buffer).unwrap();
        for (star, &bucket) in session.stars().iter().zip(&buckets) {
            assert!((1..=144).contains(&star.depth), "frame {frame}: {star:?}");
            assert_eq!(star.bucket, bucket);
        }
    }
}

#[test]
fn test_every_generator_takes_a_turn() {
    let mut session = init_session(1152, 144, 8, 10).unwrap();
    let mut buffer = IndexedBuffer::new(320, 200);
    let mut seen = Vec::new();
    for _ in 0..60 {
        session.on_tick();
        session.advance_frame(&mut buffer).unwrap();
        let active = session.active_generator();
        if seen.last() != Some(&active) {
            seen.push(active);
        }
    }
    assert_eq!(
        &seen[..5],
        &[
            GeneratorKind::Random,
            GeneratorKind::Circle,
            GeneratorKind::Net,
            GeneratorKind::InterlockingCircles,
            GeneratorKind::Random,
        ]
    );
}

#[test]
fn test_reference_palette_populated_range() {
    let palette = build_palette(17, &[1.0, 0.5, 0.25]).unwrap();
    assert!(palette.populated_end() >= 1 + 17 * 3);
    assert!(palette.len() <= 256);
}

#[test]
fn test_drawn_colours_come_from_swatches() {
    let spec = PaletteSpec::default();
    let mut session = Session::new(&SessionParams::default(), &spec, 320, 200).unwrap();
    let mut buffer = IndexedBuffer::new(320, 200);
    for _ in 0..50 {
        buffer.clear(0);
        session.advance_frame(&mut buffer).unwrap();
        for &pixel in buffer.pixels() {
            assert!(
                (pixel as usize) < spec.populated_end(),
                "pixel index {pixel} outside the swatches"
            );
        }
    }
}

#[test]
fn test_undersized_target_rejected_without_moving_stars() {
    let mut session = init_session(1152, 144, 8, 360).unwrap();
    let before = session.stars().to_vec();
    let mut small = IndexedBuffer::new(100, 100);

    let err = session.advance_frame(&mut small).unwrap_err();
    assert_eq!(
        err,
        StarfieldError::TargetTooSmall {
            width: 100,
            height: 100,
            required_width: 320,
            required_height: 200,
        }
    );
    assert_eq!(session.stars(), &before[..]);
    assert!(small.pixels().iter().all(|&p| p == 0));
    assert!(session.draw(&mut small).is_err());
}

#[test]
fn test_oversized_target_accepted() {
    let mut session = init_session(1152, 144, 8, 360).unwrap();
    let mut large = IndexedBuffer::new(640, 400);
    for _ in 0..20 {
        session.advance_frame(&mut large).unwrap();
    }
}

#[test]
fn test_huge_speed_rejected_at_creation() {
    let params = SessionParams {
        speed: i32::MAX,
        ..SessionParams::default()
    };
    let err = Session::new(&params, &PaletteSpec::default(), 320, 200).unwrap_err();
    assert_eq!(
        err,
        StarfieldError::Configuration(ConfigurationError::InvalidSpeed {
            speed: i32::MAX,
            max_dist: 144,
        })
    );
}
