use kornia_scene::{
    BoundingBox, Detection, Predicate, Relationship, RelationshipEngine, RelationshipEngineConfig,
    SceneError,
};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

fn det(name: &str, bbox: [f64; 4]) -> Result<Detection, SceneError> {
    Detection::new(name, 0.9, BoundingBox::try_from(bbox)?)
}

fn kitchen_scene() -> Result<Vec<Detection>, SceneError> {
    Ok(vec![
        det("person", [0.0, 0.0, 200.0, 400.0])?,
        det("cell phone", [80.0, 30.0, 120.0, 70.0])?,
        det("dining table", [180.0, 250.0, 600.0, 450.0])?,
        det("cup", [300.0, 200.0, 340.0, 260.0])?,
        det("cup", [420.0, 210.0, 460.0, 255.0])?,
        det("bottle", [500.0, 150.0, 540.0, 260.0])?,
        det("book", [350.0, 230.0, 410.0, 255.0])?,
        det("chair", [610.0, 200.0, 720.0, 420.0])?,
    ])
}

fn random_scene(rng: &mut StdRng, count: usize) -> Result<Vec<Detection>, SceneError> {
    const NAMES: [&str; 6] = ["person", "cup", "table", "book", "chair", "bottle"];
    (0..count)
        .map(|_| {
            let x = rng.random_range(0.0..600.0f64);
            let y = rng.random_range(0.0..400.0f64);
            let w = rng.random_range(5.0..200.0f64);
            let h = rng.random_range(5.0..200.0f64);
            let name = NAMES[rng.random_range(0..NAMES.len())];
            Detection::new(name, 0.5, BoundingBox::from_xywh(x, y, w, h)?)
        })
        .collect()
}

#[test]
fn test_idempotence() -> Result<(), SceneError> {
    let engine = RelationshipEngine::new(RelationshipEngineConfig::default())?;
    let detections = kitchen_scene()?;
    let first = engine.build_relationships(&detections);
    let second = engine.build_relationships(&detections);
    assert!(!first.is_empty());
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_permutation_invariance() -> Result<(), SceneError> {
    let engine = RelationshipEngine::new(RelationshipEngineConfig::default())?;
    let mut rng = StdRng::seed_from_u64(42);

    let mut detections = kitchen_scene()?;
    let expected = engine.build_relationships(&detections);
    for _ in 0..20 {
        detections.shuffle(&mut rng);
        assert_eq!(engine.build_relationships(&detections), expected);
    }

    for _ in 0..10 {
        let mut detections = random_scene(&mut rng, 12)?;
        let expected = engine.build_relationships(&detections);
        detections.shuffle(&mut rng);
        assert_eq!(engine.build_relationships(&detections), expected);
    }
    Ok(())
}

#[test]
fn test_dedup_law() -> Result<(), SceneError> {
    let engine = RelationshipEngine::new(RelationshipEngineConfig::default())?;
    let detections = vec![
        det("cup", [0.0, 0.0, 20.0, 20.0])?,
        det("book", [30.0, 0.0, 50.0, 20.0])?,
        det("cup", [400.0, 300.0, 420.0, 320.0])?,
        det("book", [430.0, 300.0, 450.0, 320.0])?,
    ];

    let relationships = engine.build_relationships(&detections);
    let near = Relationship::new("cup", Predicate::Near, "book");
    assert_eq!(relationships.iter().filter(|r| **r == near).count(), 1);

    // far apart copies add nothing new
    let single = engine.build_relationships(&detections[..2]);
    assert_eq!(relationships, single);
    Ok(())
}

#[test]
fn test_on_short_circuits_other_predicates() -> Result<(), SceneError> {
    let engine = RelationshipEngine::new(RelationshipEngineConfig::default())?;
    let cup = det("cup", [100.0, 100.0, 150.0, 140.0])?;
    let table = det("table", [50.0, 130.0, 250.0, 200.0])?;

    assert!(engine.classify_on(&cup, &table));
    assert!(engine.classify_near(&cup, &table));

    let relationships = engine.build_relationships(&[table, cup]);
    assert!(relationships.contains(&Relationship::new("cup", Predicate::On, "table")));
    assert!(!relationships.contains(&Relationship::new("cup", Predicate::Near, "table")));
    assert!(!relationships.contains(&Relationship::new("cup", Predicate::LeftOf, "table")));
    Ok(())
}

#[test]
fn test_holding_short_circuits_other_predicates() -> Result<(), SceneError> {
    let engine = RelationshipEngine::new(RelationshipEngineConfig::default())?;
    let person = det("person", [0.0, 0.0, 200.0, 300.0])?;
    let cup = det("cup", [90.0, 100.0, 110.0, 120.0])?;

    assert!(engine.classify_near(&person, &cup));
    let relationships = engine.build_relationships(&[person, cup]);
    assert!(relationships.contains(&Relationship::new("person", Predicate::Holding, "cup")));
    assert!(!relationships.contains(&Relationship::new("person", Predicate::Near, "cup")));
    // the reverse pair is classified on its own
    assert!(relationships.contains(&Relationship::new("cup", Predicate::Near, "person")));
    Ok(())
}

#[test]
fn test_kitchen_scene() -> Result<(), SceneError> {
    let engine = RelationshipEngine::new(RelationshipEngineConfig::default())?;
    let relationships = engine.build_relationships(&kitchen_scene()?);

    for expected in [
        Relationship::new("person", Predicate::Holding, "cell phone"),
        Relationship::new("cup", Predicate::On, "dining table"),
        Relationship::new("bottle", Predicate::On, "dining table"),
        Relationship::new("book", Predicate::On, "dining table"),
    ] {
        assert!(relationships.contains(&expected), "missing '{expected}'");
    }
    Ok(())
}

#[test]
fn test_engine_is_shareable_across_threads() -> Result<(), SceneError> {
    let engine = RelationshipEngine::new(RelationshipEngineConfig::default())?;
    let detections = kitchen_scene()?;
    let expected = engine.build_relationships(&detections);

    std::thread::scope(|s| {
        let handles = (0..4)
            .map(|_| s.spawn(|| engine.build_relationships(&detections)))
            .collect::<Vec<_>>();
        for handle in handles {
            assert_eq!(handle.join().ok(), Some(expected.clone()));
        }
    });
    Ok(())
}
