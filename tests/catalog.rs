use std::fs;
use std::path::PathBuf;

use orrery::bodies::{LoadError, System, load_system};
use orrery::core::constants::AU_M;
use orrery::core::vector;

fn config(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("configs").join(name)
}

fn satellite_names(system: &System, name: &str) -> Vec<String> {
    let body = system.body(system.find(name).unwrap()).unwrap();
    body.satellites()
        .iter()
        .map(|&id| system.body(id).unwrap().name().to_string())
        .collect()
}

#[test]
fn solar_system_hierarchy() {
    let system = load_system(config("solar_system.yaml")).expect("solar system catalog");
    assert_eq!(system.len(), 10);
    assert_eq!(satellite_names(&system, "Sun").len(), 8);
    assert_eq!(satellite_names(&system, "Earth"), vec!["Moon".to_string()]);
    assert!(satellite_names(&system, "Mars").is_empty());

    let earth = system.find_ignore_case("earth").unwrap();
    let distance = vector::norm(&system.global_position_at_time(earth, 0.0).unwrap()) / AU_M;
    assert!((0.982..0.985).contains(&distance), "distance = {distance} AU");

    let moon = system.find("Moon").unwrap();
    let relative = system.relative_state_at_time(moon, earth, 0.0).unwrap();
    let moon_distance = vector::norm(&relative.position);
    assert!((3.6e8..4.1e8).contains(&moon_distance), "moon distance = {moon_distance}");
}

#[test]
fn solar_system_rotation() {
    let system = load_system(config("solar_system.yaml")).unwrap();
    let earth = system.body(system.find("Earth").unwrap()).unwrap();
    assert!((earth.tilt().to_degrees() - 23.44).abs() < 0.1, "tilt = {}", earth.tilt().to_degrees());
    assert!((earth.synodic_day() - 86_400.0).abs() < 60.0, "day = {}", earth.synodic_day());

    let moon = system.body(system.find("Moon").unwrap()).unwrap();
    assert_eq!(moon.sidereal_day(), moon.orbit().unwrap().period());
}

#[test]
fn kerbol_system_from_json() {
    let system = load_system(config("kerbol_system.json")).expect("kerbol catalog");
    assert_eq!(system.len(), 10);
    assert_eq!(satellite_names(&system, "Kerbol").len(), 7);
    let mut moons = satellite_names(&system, "Kerbin");
    moons.sort();
    assert_eq!(moons, vec!["Minmus".to_string(), "Mun".to_string()]);

    let kerbin = system.body(system.find("Kerbin").unwrap()).unwrap();
    let soi = kerbin.sphere_of_influence();
    assert!((8.3e7..8.5e7).contains(&soi), "soi = {soi}");
}

#[test]
fn directory_of_toml_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("star.toml"),
        "[Star]\nradius = 7.0e8\ngravitational_parameter = 1.3e20\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("planets.toml"),
        "[Rock]\nradius = 3.0e6\ngravitational_parameter = 4.0e13\n\n[Rock.orbit]\nprimary = \"Star\"\nsemi_major_axis = 2.0e11\neccentricity = 0.1\n",
    )
    .unwrap();

    let system = load_system(dir.path()).unwrap();
    assert_eq!(system.len(), 2);
    assert_eq!(satellite_names(&system, "Star"), vec!["Rock".to_string()]);
    let rock = system.find("Rock").unwrap();
    let periapsis = vector::norm(&system.global_position_at_time(rock, 0.0).unwrap());
    assert!((periapsis - 1.8e11).abs() < 1.0);
}

#[test]
fn unknown_primary_aborts_loading() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.yaml");
    fs::write(&path, "Stray:\n  radius: 1.0\n  orbit:\n    primary: Nowhere\n    semi_major_axis: 1.0e9\n").unwrap();
    assert!(matches!(load_system(&path), Err(LoadError::UnknownPrimary { .. })));
}
