/// One frame's worth of intent, decoupled from the windowing layer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputCmd {
    pub forward: f32, // –1 … +1
    pub strafe: f32,  // –1 … +1  (left / right)
    pub turn: f32,    // –1 … +1  (right / left)
}

impl InputCmd {
    /// Build from held keys; opposite keys cancel.
    pub fn from_keys(
        fwd: bool,
        back: bool,
        left: bool,
        right: bool,
        turn_l: bool,
        turn_r: bool,
    ) -> Self {
        let axis = |pos: bool, neg: bool| pos as i8 as f32 - neg as i8 as f32;
        Self {
            forward: axis(fwd, back),
            strafe: axis(right, left),
            turn: axis(turn_l, turn_r),
        }
    }
}
