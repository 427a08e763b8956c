use windtunnel_engine::FluidSim;

#[test]
fn perf_smoke_step() {
    let mut sim = FluidSim::new(128, 64);
    sim.enable_perf_metrics(true);
    sim.begin_stroke();
    sim.paint_barriers_in_radius(32, 32, 6);
    sim.end_stroke();
    sim.step();

    let stats = sim.get_perf_stats();
    assert!(stats.frame_ms() >= 0.0);
    assert!(stats.collision_ms() >= 0.0);
    assert!(stats.streaming_ms() >= 0.0);
    assert_eq!(stats.substeps(), 20);
    assert_eq!(stats.cells(), 128 * 64);
    assert!(stats.barrier_cells() > 0);
    assert!(stats.max_speed() > 0.0);
}

#[test]
fn frame_layout_points_at_live_buffers() {
    let mut sim = FluidSim::new(40, 16);
    sim.step();
    let layout = sim.frame_layout();
    assert_eq!((layout.width(), layout.height()), (40, 16));
    assert_eq!(layout.colors_len_elements(), 640);
    assert_eq!(layout.colors_len_bytes(), 640 * 4);
    assert_eq!(layout.rgb_len_elements(), 640 * 3);
    assert_eq!(layout.barrier_len_elements(), 640);
    assert_eq!(sim.colors_len(), 640);
}
