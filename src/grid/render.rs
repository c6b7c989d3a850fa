use crate::model::{ActionName, GridCoord, Problem};

/// Three-character cell for a best action: an arrow for grid moves, `?` for
/// anything else (named actions, unsolved states).
pub fn glyph(action: Option<&ActionName>) -> &'static str {
    match action {
        Some(ActionName::East) => " → ",
        Some(ActionName::North) => " ↑ ",
        Some(ActionName::West) => " ← ",
        Some(ActionName::South) => " ↓ ",
        Some(ActionName::Named(_)) | None => " ? ",
    }
}

/// Renders the best action of every grid state.
///
/// Rows run from the largest `y` down to `y = 1`, columns from `x = 1` to
/// the largest `x`. The goal shows as `G`; cells with no state are blank.
/// States without coordinates are skipped.
pub fn render_policy_grid(problem: &Problem) -> String {
    let coords = problem.states().iter().filter_map(|s| s.coord());
    let (max_x, max_y) = coords.fold((0_i32, 0_i32), |(mx, my), c| (mx.max(c.x), my.max(c.y)));

    let mut out = String::new();
    for y in (1..=max_y).rev() {
        for x in 1..=max_x {
            let cell = match problem.state_at(GridCoord::new(x, y)) {
                Some(state) if problem.is_goal(state.id()) => " G ",
                Some(state) => glyph(problem.best_action_name(state.id())),
                None => "   ",
            };
            out.push_str(cell);
        }
        out.push('\n');
    }
    out
}
