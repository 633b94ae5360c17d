use bevy_math::uvec2;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pprof::criterion::{Output, PProfProfiler};
use toggle_maze::{Grid, GridLayers, Solver, PERMANENT_COLOR};

const ROWS: u32 = 63;
const COLS: u32 = 64;

/// A serpentine labyrinth: every odd row is a permanent wall with a gap
/// at alternating ends, and seven of the gaps are gated by a colored
/// wall whose button sits mid-way along the open row before it.
fn gate_maze() -> Grid {
    let area = (ROWS * COLS) as usize;
    let mut walls = vec![0u8; area];
    let mut active = vec![0u8; area];
    let mut buttons = vec![0u8; area];
    let mut wall_colors = vec![-1i32; area];
    let mut button_colors = vec![-1i32; area];

    let gate_colors = [0i32, 2, 3, 4, 5, 6, 7];
    let mut gate_i = 0;

    for row in (1..ROWS - 1).step_by(2) {
        let gap_col = if ((row - 1) / 2) % 2 == 0 { COLS - 1 } else { 0 };
        for col in 0..COLS {
            let flat_i = (row * COLS + col) as usize;
            if col != gap_col {
                walls[flat_i] = 1;
                active[flat_i] = 1;
                wall_colors[flat_i] = PERMANENT_COLOR as i32;
            } else if matches!(row, 9 | 17 | 25 | 33 | 41 | 49 | 57) {
                walls[flat_i] = 1;
                active[flat_i] = 1;
                wall_colors[flat_i] = gate_colors[gate_i];

                let button_i = ((row - 1) * COLS + COLS / 2) as usize;
                buttons[button_i] = 1;
                button_colors[button_i] = gate_colors[gate_i];
                gate_i += 1;
            }
        }
    }

    Grid::new(
        &GridLayers {
            walls: &walls,
            active: &active,
            buttons: &buttons,
            wall_colors: &wall_colors,
            button_colors: &button_colors,
            rows: ROWS,
            cols: COLS,
        },
        uvec2(0, ROWS - 1),
        PERMANENT_COLOR,
    )
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve");
    group.sample_size(50);

    let mut solver = Solver::new(gate_maze());

    group.bench_function("solve_serpentine_gates", |b| {
        b.iter(|| {
            let result = solver.solve(black_box(uvec2(0, 0))).unwrap();
            black_box(result);
        });
    });

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default().with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)));
    targets = criterion_benchmark
}
criterion_main!(benches);
