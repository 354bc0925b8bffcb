use lattice_chunk::{BlockType, Chunk, ChunkBuf};
use lattice_geom::Vec3;
use lattice_world::{
    FastNoiseField, GenParams, GenerationControl, TerrainGenerator, World, WorldConfig, read_chunk,
};

fn small_config() -> WorldConfig {
    WorldConfig::from_toml_str(
        r#"
        [world]
        size = [32, 128, 32]
        seed = 1234

        [chunk]
        dims = [16, 64, 16]

        [grid]
        viewing_distance = [2, 2, 2]
        "#,
    )
    .unwrap()
}

fn generate(cfg: &WorldConfig) -> World<ChunkBuf> {
    let world = World::new(cfg);
    let noise = FastNoiseField::new(cfg.world.seed, &cfg.noise);
    TerrainGenerator::new(&noise, GenParams::from_config(cfg))
        .run(&world, &GenerationControl::new())
        .unwrap();
    world
}

#[test]
fn same_seed_generates_identical_worlds() {
    let cfg = small_config();
    let a = generate(&cfg);
    let b = generate(&cfg);
    assert_eq!(a.store().present_coords(), b.store().present_coords());
    for (coord, cell) in a.store().iter_present() {
        let other = b.store().get(coord).unwrap();
        assert_eq!(read_chunk(cell).blocks, read_chunk(other).blocks, "chunk {:?}", coord);
    }
}

#[test]
fn generated_blocks_use_known_types() {
    let cfg = small_config();
    let world = generate(&cfg);
    assert!(world.store().created_count() > 0);
    for (_, cell) in world.store().iter_present() {
        let chunk = read_chunk(cell);
        assert!(chunk.blocks.iter().all(|b| b.0 <= BlockType::STONE.0));
    }
}

#[test]
fn every_column_has_at_most_one_surface_block() {
    let cfg = small_config();
    let world = generate(&cfg);
    for x in 0..32 {
        for z in 0..32 {
            let surfaces = (0..128)
                .filter(|y| world.get_block(Vec3::new(x as f32, *y as f32, z as f32)) == BlockType::SURFACE)
                .count();
            assert!(surfaces <= 1, "column ({x},{z}) has {surfaces} surface blocks");
        }
    }
}

#[test]
fn chunks_know_their_slot() {
    let cfg = small_config();
    let world = generate(&cfg);
    for (coord, cell) in world.store().iter_present() {
        assert_eq!(read_chunk(cell).coord(), coord);
    }
}
