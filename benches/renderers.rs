use criterion::{
    Criterion,
    criterion_group,
    criterion_main
};
use perfect_mazes::cells::Cartesian2DCoordinate;
use perfect_mazes::generators;
use perfect_mazes::pathing::{self, DistanceMap};
use perfect_mazes::renderers::{self, RenderOptionsBuilder};
use perfect_mazes::units::{Height, Width};

fn bench_render_png_buffer(c: &mut Criterion) {
    c.bench_function("render_square_grid", |b| {
        let g = generators::prims(Width(100), Height(100), Some(42)).unwrap();
        let start = Cartesian2DCoordinate::new(0, 0);
        let distances = DistanceMap::for_grid(&g, start).unwrap();
        let options = RenderOptionsBuilder::new()
            .colour_distances(true)
            .distances(Some(&distances))
            .mark_start_end(true)
            .start(Some(start))
            .build();
        b.iter(|| renderers::render_square_grid(&g, &options))
    });
}

fn bench_wavefront_frames(c: &mut Criterion) {
    c.bench_function("wavefront_frames", |b| {
        let g = generators::wilson(Width(40), Height(40), Some(42)).unwrap();
        let end = Cartesian2DCoordinate::new(39, 39);
        let wavefront = pathing::dijkstra_wavefront(&g, Cartesian2DCoordinate::new(0, 0), end)
            .unwrap();
        b.iter(|| renderers::wavefront_frames(&g, &wavefront, end, 6, 50))
    });
}

criterion_group!(benches, bench_render_png_buffer, bench_wavefront_frames);
criterion_main!(benches);
