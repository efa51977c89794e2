mod support;

use std::fs;

use sim_core::error::SimError;
use sim_core::poi::PoiCatalog;
use sim_core::scenario::FleetParams;
use support::schedule::TickRunner;
use support::world::{vehicles, TestFleetBuilder};

const CORRIENTES: &str = r#"[
    {"name": "Plaza 25 de Mayo", "latitude": -27.4669, "longitude": -58.8306},
    {"name": "Costanera Sur", "latitude": -27.4735, "longitude": -58.8468},
    {"name": "Terminal de Omnibus", "latitude": -27.4825, "longitude": -58.8067},
    {"name": "Puente General Belgrano", "latitude": -27.4623, "longitude": -58.8566}
]"#;

const MENDOZA: &str = r#"[
    {"name": "Plaza Independencia", "latitude": -32.8894, "longitude": -68.8458},
    {"name": "Parque General San Martin", "latitude": -32.8908, "longitude": -68.8782},
    {"name": "Terminal del Sol", "latitude": -32.8953, "longitude": -68.8291}
]"#;

#[test]
fn fleet_runs_on_catalog_loaded_from_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("pois_corrientes.json"), CORRIENTES).expect("write");
    fs::write(dir.path().join("pois_mendoza.json"), MENDOZA).expect("write");
    fs::write(dir.path().join("pois_broken.json"), "[{").expect("write");

    let catalog = PoiCatalog::load_dir(dir.path()).expect("catalog");
    assert_eq!(
        catalog.provinces().collect::<Vec<_>>(),
        vec!["corrientes", "mendoza"]
    );

    let params = FleetParams::default()
        .with_province("corrientes", 4)
        .with_province("mendoza", 2)
        .with_seed(99);
    let (mut world, publisher) = TestFleetBuilder::new()
        .with_params(params)
        .with_catalog(catalog.clone())
        .build();
    TickRunner::new().run(&mut world, 50);

    let fleet = vehicles(&mut world);
    assert_eq!(fleet.len(), 6);
    assert_eq!(
        fleet.iter().filter(|v| v.province() == "mendoza").count(),
        2
    );
    assert_eq!(publisher.messages().len(), 300);

    // Vehicles start at, and drive between, POIs of their own province only.
    for vehicle in &fleet {
        let pois = catalog.get(vehicle.province()).expect("province");
        if let Some(destination) = vehicle.destination() {
            assert!(pois.iter().any(|poi| poi.coordinate() == destination));
        }
    }
}

#[test]
fn directory_without_usable_files_is_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("pois_broken.json"), "not json").expect("write");
    fs::write(dir.path().join("notes.json"), CORRIENTES).expect("write");

    let err = PoiCatalog::load_dir(dir.path()).expect_err("no provinces");
    assert!(matches!(err, SimError::NoProvincesLoaded { .. }));
    assert!(err.to_string().contains("no provinces"));
}
