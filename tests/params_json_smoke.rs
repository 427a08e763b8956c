use windtunnel_engine::{Parameters, Simulation, VisualizationMode};

#[test]
fn defaults_round_trip_through_json() {
    let params = Parameters::default();
    let json = params.to_json();
    assert!(json.contains("\"gridWidth\":400"));
    assert!(json.contains("\"visualizationMode\":\"speed\""));
    assert_eq!(Parameters::from_json(&json).unwrap(), params);
}

#[test]
fn simulation_starts_from_a_params_document() {
    let params = Parameters::from_json(
        r#"{
            "gridWidth": 48,
            "gridHeight": 20,
            "tau": 0.8,
            "inflowVelocity": 0.08,
            "noSlip": true,
            "visualizationMode": "schlieren",
            "stepsPerFrame": 4
        }"#,
    )
    .unwrap();
    let mut sim = Simulation::from_parameters(params).unwrap();
    assert_eq!((sim.width(), sim.height()), (48, 20));

    sim.step_frame();
    assert_eq!(sim.substep(), 4);
    assert_eq!(sim.params().visualization_mode, VisualizationMode::Schlieren);
    assert!(sim.params().no_slip);
}

#[test]
fn invalid_documents_never_build_a_simulation() {
    let mut params = Parameters::default();
    params.grid_width = 0;
    assert!(Simulation::from_parameters(params).is_err());

    assert!(Parameters::from_json(r#"{"inflowVelocity": 0.35}"#).is_err());
    assert!(Parameters::from_json(r#"{"visualizationMode": "vorticity"}"#).is_err());
}
