//! Axis, pole, and cardinal direction enums.

use std::ops::Neg;
use vek::*;


macro_rules! axis_enum {
    (
        $name:ident,
        $num_constant:ident = $num:expr,
        $all_constant:ident,
        ($(
            $variant:ident,
        )*),
    )=>{
        #[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        #[repr(u8)]
        pub enum $name {$(
            $variant,
        )*}

        pub const $num_constant: usize = $num;

        /// Every variant, in declaration order.
        pub const $all_constant: [$name; $num_constant] = [$(
            $name::$variant,
        )*];
    };
}

axis_enum!(
    Axis,
    NUM_AXES = 3,
    AXES,
    (
        X,
        Y,
        Z,
    ),
);

impl Axis {
    /// The two axes which are not self, in XYZ order.
    pub const fn other_axes(self) -> [Axis; 2] {
        match self {
            Axis::X => [Axis::Y, Axis::Z],
            Axis::Y => [Axis::X, Axis::Z],
            Axis::Z => [Axis::X, Axis::Y],
        }
    }

    /// Whether this axis lies in the ground plane.
    pub const fn is_horizontal(self) -> bool {
        !matches!(self, Axis::Y)
    }
}

/// Negative or positive direction along an axis.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Pole {
    Neg,
    Pos,
}

impl Pole {
    pub const fn to_int(self) -> i64 {
        match self {
            Pole::Neg => -1,
            Pole::Pos => 1,
        }
    }
}

impl Neg for Pole {
    type Output = Self;

    fn neg(self) -> Self {
        match self {
            Pole::Neg => Pole::Pos,
            Pole::Pos => Pole::Neg,
        }
    }
}

axis_enum!(
    Cardinal,
    NUM_CARDINALS = 6,
    CARDINALS,
    (
        West,
        East,
        Down,
        Up,
        North,
        South,
    ),
);

impl Cardinal {
    /// West is -X, down is -Y, north is -Z.
    pub const fn to_axis_pole(self) -> (Axis, Pole) {
        match self {
            Cardinal::West => (Axis::X, Pole::Neg),
            Cardinal::East => (Axis::X, Pole::Pos),
            Cardinal::Down => (Axis::Y, Pole::Neg),
            Cardinal::Up => (Axis::Y, Pole::Pos),
            Cardinal::North => (Axis::Z, Pole::Neg),
            Cardinal::South => (Axis::Z, Pole::Pos),
        }
    }

    pub const fn from_axis_pole(axis: Axis, pole: Pole) -> Self {
        match (axis, pole) {
            (Axis::X, Pole::Neg) => Cardinal::West,
            (Axis::X, Pole::Pos) => Cardinal::East,
            (Axis::Y, Pole::Neg) => Cardinal::Down,
            (Axis::Y, Pole::Pos) => Cardinal::Up,
            (Axis::Z, Pole::Neg) => Cardinal::North,
            (Axis::Z, Pole::Pos) => Cardinal::South,
        }
    }

    pub const fn axis(self) -> Axis {
        self.to_axis_pole().0
    }

    pub const fn pole(self) -> Pole {
        self.to_axis_pole().1
    }

    /// Unit vector pointing out of a box through this face.
    pub fn to_vec(self) -> Vec3<i64> {
        let (axis, pole) = self.to_axis_pole();
        let mut vec = Vec3::zero();
        vec[axis as usize] = pole.to_int();
        vec
    }

    /// Inverse of `to_vec`. None unless exactly one component is non-zero with magnitude 1.
    pub fn from_vec(vec: Vec3<i64>) -> Option<Self> {
        let mut found = None;
        for axis in AXES {
            match vec[axis as usize] {
                0 => (),
                n @ (-1 | 1) if found.is_none() => {
                    let pole = if n < 0 { Pole::Neg } else { Pole::Pos };
                    found = Some(Cardinal::from_axis_pole(axis, pole));
                }
                _ => return None,
            }
        }
        found
    }
}

impl Neg for Cardinal {
    type Output = Self;

    fn neg(self) -> Self {
        let (axis, pole) = self.to_axis_pole();
        Cardinal::from_axis_pole(axis, -pole)
    }
}


#[test]
fn test_cardinal_axis_pole_roundtrip() {
    for cardinal in CARDINALS {
        let (axis, pole) = cardinal.to_axis_pole();
        assert_eq!(Cardinal::from_axis_pole(axis, pole), cardinal);
        assert_eq!(Cardinal::from_vec(cardinal.to_vec()), Some(cardinal));
        assert_eq!(-(-cardinal), cardinal);
        assert_ne!(-cardinal, cardinal);
        assert_eq!((-cardinal).axis(), axis);
    }
}

#[test]
fn test_cardinal_from_vec_rejects_diagonals() {
    assert_eq!(Cardinal::from_vec(Vec3::new(1, 1, 0)), None);
    assert_eq!(Cardinal::from_vec(Vec3::new(0, 0, 0)), None);
    assert_eq!(Cardinal::from_vec(Vec3::new(0, 2, 0)), None);
    assert_eq!(Cardinal::from_vec(Vec3::new(0, -1, 0)), Some(Cardinal::Down));
}

#[test]
fn test_horizontal_axes() {
    assert!(Axis::X.is_horizontal());
    assert!(!Axis::Y.is_horizontal());
    assert!(Axis::Z.is_horizontal());
    for axis in AXES {
        assert!(!axis.other_axes().contains(&axis));
    }
}
