//! Coordinate bit-fiddling.

use vek::*;


/// Number of bits of each local tile coordinate component.
const LTC_BITS: i64 = 4;

/// Extent of a chunk section along every axis.
pub const CHUNK_EXTENT: i64 = 1 << LTC_BITS;

/// Max local tile coordinate component.
pub const MAX_LTC: u16 = (CHUNK_EXTENT - 1) as u16;

/// Number of local tile indices.
pub const NUM_LTIS: usize = 1 << (LTC_BITS * 3);

/// Max local tile index.
pub const MAX_LTI: u16 = (NUM_LTIS - 1) as u16;

const LTC_MASK: i64 = CHUNK_EXTENT - 1;

const Y_SHIFT: u16 = 8;
const Z_SHIFT: u16 = 4;


/// Convert local tile coordinate to local tile index.
///
/// Packs as `y4|y3|y2|y1 | z4|z3|z2|z1 | x4|x3|x2|x1`, so that horizontal slices are contiguous.
///
/// Panics if out of range.
pub fn ltc_to_lti(ltc: Vec3<u16>) -> u16 {
    assert!(ltc.x <= MAX_LTC, "ltc x out of range");
    assert!(ltc.y <= MAX_LTC, "ltc y out of range");
    assert!(ltc.z <= MAX_LTC, "ltc z out of range");

    (ltc.y << Y_SHIFT) | (ltc.z << Z_SHIFT) | ltc.x
}

/// Convert local tile index to local tile coordinate.
pub fn lti_to_ltc(lti: u16) -> Vec3<u16> {
    let mask = MAX_LTC;
    Vec3 {
        x: lti & mask,
        y: (lti >> Y_SHIFT) & mask,
        z: (lti >> Z_SHIFT) & mask,
    }
}

/// Get chunk coordinate part of global tile coordinate.
///
/// Arithmetic shift rounds towards negative infinity, so negative coordinates land in the chunk
/// below them rather than in chunk 0.
pub fn gtc_get_cc(gtc: Vec3<i64>) -> Vec3<i64> {
    gtc.map(|n| n >> LTC_BITS)
}

/// Get local tile coordinate part of global tile coordinate.
pub fn gtc_get_ltc(gtc: Vec3<i64>) -> Vec3<u16> {
    gtc.map(|n| (n & LTC_MASK) as u16)
}

/// Get local tile index part of global tile coordinate.
pub fn gtc_get_lti(gtc: Vec3<i64>) -> u16 {
    ltc_to_lti(gtc_get_ltc(gtc))
}

/// Combine chunk coordinate and local tile coordinate into global tile coordinate.
pub fn cc_ltc_to_gtc(cc: Vec3<i64>, ltc: Vec3<u16>) -> Vec3<i64> {
    Vec3 {
        x: (cc.x << LTC_BITS) | (ltc.x as i64 & LTC_MASK),
        y: (cc.y << LTC_BITS) | (ltc.y as i64 & LTC_MASK),
        z: (cc.z << LTC_BITS) | (ltc.z as i64 & LTC_MASK),
    }
}

/// Global tile coordinate containing the given world position.
pub fn pos_to_gtc(pos: Vec3<f64>) -> Vec3<i64> {
    pos.map(|n| n.floor() as i64)
}


#[test]
fn test_lti_packing() {
    for lti in 0..=MAX_LTI {
        assert_eq!(lti, ltc_to_lti(lti_to_ltc(lti)));
    }
}

#[test]
fn test_coord_splitting_joining() {
    for x in -40..40 {
        for y in -40..40 {
            for z in [-17, -16, -1, 0, 1, 15, 16, 33] {
                let gtc = Vec3::new(x, y, z);
                assert_eq!(
                    gtc,
                    cc_ltc_to_gtc(gtc_get_cc(gtc), gtc_get_ltc(gtc)),
                );
            }
        }
    }
}

#[test]
fn test_negative_coords_floor() {
    assert_eq!(gtc_get_cc(Vec3::new(-1, 0, 16)), Vec3::new(-1, 0, 1));
    assert_eq!(gtc_get_ltc(Vec3::new(-1, 0, 16)), Vec3::new(15, 0, 0));
    assert_eq!(pos_to_gtc(Vec3::new(-0.3, 0.0, 1.999)), Vec3::new(-1, 0, 1));
}
