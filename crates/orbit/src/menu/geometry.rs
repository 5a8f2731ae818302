//! Pointer-to-slot geometry.
//!
//! Angles handed out by this module follow the menu convention: degrees, 0° at the top of the
//! menu, growing clockwise on screen (y grows downward). Slot `i` of an `N`-slot ring is centered
//! on `origin + i * 360/N` and owns the half-open interval `[center - step/2, center + step/2)`,
//! so a pointer exactly on a boundary belongs to the clockwise neighbour.

use strum::Display as StrumDisplay;

pub const FULL_TURN: f64 = 360.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector from `origin` to `self`.
    pub fn offset_from(self, origin: Point) -> Point {
        Point::new(self.x - origin.x, self.y - origin.y)
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance_to(self, other: Point) -> f64 {
        self.offset_from(other).length()
    }
}

/// Wraps any angle into `[0, 360)`.
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(FULL_TURN);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0
    if wrapped >= FULL_TURN { 0.0 } else { wrapped }
}

/// Pointer offset from a menu center, in menu convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polar {
    pub angle: f64,
    pub distance: f64,
}

impl Polar {
    pub fn from_offset(offset: Point) -> Self {
        let math_angle = normalize_degrees(offset.y.atan2(offset.x).to_degrees());
        Self {
            // 0° east (math) becomes 0° north (menu)
            angle: normalize_degrees(math_angle + 90.0),
            distance: offset.length(),
        }
    }
}

/// Maps a menu-convention angle onto one of `slot_count` equal slots.
pub fn slot_for_angle(angle: f64, slot_count: usize, angle_origin: f64) -> Option<usize> {
    if slot_count == 0 {
        return None;
    }
    let step = FULL_TURN / slot_count as f64;
    let shifted = normalize_degrees(angle - angle_origin + step / 2.0);
    let index = (shifted / step).floor() as usize;
    Some(index.min(slot_count - 1))
}

/// Resolves a pointer offset from the menu center into a slot index.
pub fn resolve_slot(offset: Point, slot_count: usize, angle_origin: f64) -> Option<usize> {
    slot_for_angle(Polar::from_offset(offset).angle, slot_count, angle_origin)
}

/// Annular hit-test bounds. Both edges belong to the ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ring {
    pub inner: f64,
    pub outer: f64,
}

impl Ring {
    pub fn new(inner: f64, outer: f64) -> Self {
        Self { inner, outer }
    }

    pub fn contains(&self, distance: f64) -> bool {
        distance >= self.inner && distance <= self.outer
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.inner * factor, self.outer * factor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum RingId {
    Main,
    Submenu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingHit {
    Center,
    Ring(RingId),
    Outside,
}

/// Classifies a distance against rings listed innermost first.
///
/// Anything below the first ring's inner radius is the center hole. A gap between two rings is
/// attributed to the outer one, and the last ring's outer bound is widened by `grace_margin` so
/// a slight overshoot does not drop the pointer out of the outermost ring.
pub fn classify_distance(distance: f64, rings: &[(RingId, Ring)], grace_margin: f64) -> RingHit {
    let Some((_, first)) = rings.first() else {
        return RingHit::Outside;
    };
    if distance < first.inner {
        return RingHit::Center;
    }

    let last = rings.len() - 1;
    rings
        .iter()
        .enumerate()
        .find(|(i, (_, ring))| {
            let outer = if *i == last {
                ring.outer + grace_margin
            } else {
                ring.outer
            };
            distance <= outer
        })
        .map(|(_, (id, _))| RingHit::Ring(*id))
        .unwrap_or(RingHit::Outside)
}

/// Radii shared by every ring of a menu, taken from the active appearance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingMetrics {
    pub center_radius: f64,
    pub ring_thickness: f64,
    pub ring_gap: f64,
}

impl RingMetrics {
    pub fn main_ring(&self) -> Ring {
        Ring::new(self.center_radius, self.center_radius + self.ring_thickness)
    }

    /// The submenu ring sits outside the main ring, separated by `ring_gap`, and has the same
    /// thickness.
    pub fn submenu_ring(&self) -> Ring {
        let inner = self.main_ring().outer + self.ring_gap;
        Ring::new(inner, inner + self.ring_thickness)
    }
}

/// Hit-test description of one ring with `slot_count` equal slots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingLayout {
    pub ring: Ring,
    pub slot_count: usize,
    pub angle_origin: f64,
}

impl RingLayout {
    pub fn new(ring: Ring, slot_count: usize) -> Self {
        Self {
            ring,
            slot_count,
            angle_origin: 0.0,
        }
    }

    pub fn with_origin(mut self, angle_origin: f64) -> Self {
        self.angle_origin = angle_origin;
        self
    }

    /// A ring without slots is never hit-tested.
    pub fn is_active(&self) -> bool {
        self.slot_count > 0
    }

    pub fn angular_step(&self) -> Option<f64> {
        self.is_active()
            .then(|| FULL_TURN / self.slot_count as f64)
    }

    pub fn slot_at(&self, angle: f64) -> Option<usize> {
        slot_for_angle(angle, self.slot_count, self.angle_origin)
    }

    /// Slot under the pointer, only when the pointer is inside the ring band.
    pub fn hit(&self, polar: Polar) -> Option<usize> {
        self.ring
            .contains(polar.distance)
            .then(|| self.slot_at(polar.angle))
            .flatten()
    }

    /// Visual center of a slot, menu convention.
    pub fn slot_center(&self, index: usize) -> Option<f64> {
        let step = self.angular_step()?;
        (index < self.slot_count)
            .then(|| normalize_degrees(self.angle_origin + index as f64 * step))
    }
}
