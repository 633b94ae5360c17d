use bevy_math::uvec2;
use toggle_maze::{Grid, GridLayers, Solver, PERMANENT_COLOR};

fn main() {
    // A 3x5 puzzle. `#` is a color-0 wall that starts active, `b` is the
    // color-0 button that opens it, `s` the start and `t` the target:
    //
    //   s . # . t
    //   . b . . .
    //   . . . . .
    //
    // The shortest plan detours one row down to press the button, then
    // walks through the opened wall.
    let walls = [
        0, 0, 1, 0, 0, //
        0, 0, 0, 0, 0, //
        0, 0, 0, 0, 0,
    ];
    let active = walls;
    let buttons = [
        0, 0, 0, 0, 0, //
        0, 1, 0, 0, 0, //
        0, 0, 0, 0, 0,
    ];
    let wall_colors = [
        -1, -1, 0, -1, -1, //
        -1, -1, -1, -1, -1, //
        -1, -1, -1, -1, -1,
    ];
    let button_colors = [
        -1, -1, -1, -1, -1, //
        -1, 0, -1, -1, -1, //
        -1, -1, -1, -1, -1,
    ];

    let grid = Grid::new(
        &GridLayers {
            walls: &walls,
            active: &active,
            buttons: &buttons,
            wall_colors: &wall_colors,
            button_colors: &button_colors,
            rows: 3,
            cols: 5,
        },
        uvec2(4, 0),
        PERMANENT_COLOR,
    );

    let mut solver = Solver::new(grid);
    match solver.solve(uvec2(0, 0)) {
        Some(result) => {
            println!("{}", toggle_maze::version());
            println!(
                "solved in {} steps, {} nodes expanded",
                result.cost, result.considered_nodes
            );
            for point in &result.path {
                println!("  ({}, {})", point.y, point.x);
            }
        }
        None => println!("no path"),
    }
}
