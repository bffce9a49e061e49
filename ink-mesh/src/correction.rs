//! Flipped-triangle correction
//!
//! Quantizing positions onto a coarse grid can invert the winding of a
//! triangle whose true area is small relative to the grid step. This module
//! searches for single-step "nudges" of position codes that restore a
//! non-negative signed area without inverting neighbors.
//!
//! The search is greedy and local:
//!
//! 1. Quantize every position and mark each triangle whose area was `>= 0`
//!    before quantization and `< 0` after as `Flipped`, queueing it.
//! 2. For each queued triangle still `Flipped`, try candidate nudges in
//!    priority order (fewest vertices, then fewest components, then lowest
//!    mask). Each nudged component moves one step back across its original
//!    value, opposite to its rounding.
//! 3. Apply the best candidate: its vertices become permanently corrected,
//!    the triangle and any neighbors it repaired become `Fixed`, and any
//!    neighbors it inverted become `Flipped` and are queued.
//!
//! A vertex is corrected at most once and `Fixed` triangles are never
//! inverted again, which bounds the work. When a triangle cannot be repaired
//! the whole correction is abandoned and an empty map is returned; the mesh is
//! then packed uncorrected.
//!
//! Corrections are reported as integer codes so the vertex copier packs them
//! exactly. Dequantizing and re-quantizing could round a nudge away when the
//! grid step is small relative to the offset.
//!
//! Signs are computed exactly on integer codes: the grid scale is positive per
//! axis, so the sign of the code-space cross product equals the sign of the
//! float-space area.

use std::collections::VecDeque;

use glam::{DVec2, Vec2};
use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::attribute::{AttributeType, MeshAttributeCodingParams};
use crate::packing::bits::max_value_for_bits;
use crate::packing::coding::quantize_single_float;

/// Corrected position codes per original vertex index, one code per axis
pub type CorrectedPositions = HashMap<u32, [u32; 2]>;

type Code = [i64; 2];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlipState {
    NotFlipped,
    Flipped,
    Fixed,
}

/// Candidate nudge bitmasks in search order.
///
/// Bit `2 * slot + axis` nudges component `axis` of the triangle's vertex in
/// `slot`. Ordered by affected vertex count, then affected component count,
/// then mask value.
pub fn candidate_masks() -> Vec<u8> {
    let mut masks: Vec<u8> = (1..64).collect();
    masks.sort_by_key(|&mask| {
        let vertices = (0..3).filter(|slot| mask >> (2 * slot) & 0b11 != 0).count();
        (vertices, mask.count_ones(), mask)
    });
    masks
}

/// Signed doubled area of a triangle in code space
#[inline]
fn cross(a: Code, b: Code, c: Code) -> i64 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

/// Signed doubled area of a triangle in float space
#[inline]
fn original_cross(a: Vec2, b: Vec2, c: Vec2) -> f64 {
    let a = a.as_dvec2();
    DVec2::perp_dot(b.as_dvec2() - a, c.as_dvec2() - a)
}

/// A surviving candidate nudge
#[derive(Debug)]
struct Candidate {
    nudged: SmallVec<[(u32, Code); 3]>,
    newly_flipped: Vec<usize>,
    newly_fixed: Vec<usize>,
}

impl Candidate {
    fn is_perfect(&self, flipped_neighbors: usize) -> bool {
        self.newly_flipped.is_empty() && self.newly_fixed.len() == flipped_neighbors
    }

    fn better_than(&self, other: &Candidate) -> bool {
        (self.newly_flipped.is_empty(), self.newly_fixed.len())
            > (other.newly_flipped.is_empty(), other.newly_fixed.len())
    }
}

/// Transient search state for one correction run
struct FlipCorrection<'a> {
    triangles: &'a [[u32; 3]],
    /// Current code per vertex, including applied nudges
    codes: Vec<Code>,
    /// Nudge direction per vertex component (`-1`, `0` or `1`)
    directions: Vec<[i8; 2]>,
    /// Area was non-negative before quantization
    eligible: Vec<bool>,
    states: Vec<FlipState>,
    queue: VecDeque<usize>,
    /// Triangles sharing at least one vertex, excluding self. Empty when
    /// nothing is flipped.
    adjacency: Vec<Vec<u32>>,
    /// Largest representable code per axis
    max_code: Code,
    /// Append-only: a corrected vertex is never nudged again
    corrected: HashMap<u32, Code>,
    masks: Vec<u8>,
}

impl<'a> FlipCorrection<'a> {
    fn new(
        positions: &[Vec2],
        triangles: &'a [[u32; 3]],
        params: &MeshAttributeCodingParams,
        bits: [u8; 2],
    ) -> Option<Self> {
        let max_code = bits.map(|b| max_value_for_bits(b) as i64);

        let mut codes = Vec::with_capacity(positions.len());
        let mut directions = Vec::with_capacity(positions.len());
        for position in positions {
            let mut code = [0i64; 2];
            let mut direction = [0i8; 2];
            for axis in 0..2 {
                let c = &params.components[axis];
                let exact = (position[axis] - c.offset) / c.scale;
                let rounded = quantize_single_float(c, position[axis]);
                if !(0.0..=max_code[axis] as f32).contains(&rounded) {
                    return None;
                }
                code[axis] = rounded as i64;
                direction[axis] = if exact > rounded {
                    1
                } else if exact < rounded {
                    -1
                } else {
                    0
                };
            }
            codes.push(code);
            directions.push(direction);
        }

        let mut eligible = Vec::with_capacity(triangles.len());
        let mut states = Vec::with_capacity(triangles.len());
        let mut queue = VecDeque::new();
        for (t, tri) in triangles.iter().enumerate() {
            let [a, b, c] = tri.map(|v| v as usize);
            let was_non_negative = original_cross(positions[a], positions[b], positions[c]) >= 0.0;
            let flipped = was_non_negative && cross(codes[a], codes[b], codes[c]) < 0;
            eligible.push(was_non_negative);
            if flipped {
                states.push(FlipState::Flipped);
                queue.push_back(t);
            } else {
                states.push(FlipState::NotFlipped);
            }
        }

        let adjacency = if queue.is_empty() {
            Vec::new()
        } else {
            triangle_adjacency(triangles, positions.len())
        };

        Some(Self {
            triangles,
            codes,
            directions,
            eligible,
            states,
            queue,
            adjacency,
            max_code,
            corrected: HashMap::new(),
            masks: candidate_masks(),
        })
    }

    fn needs_correction(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Evaluate one nudge of triangle `t`, or `None` if it is rejected
    fn evaluate(&self, t: usize, mask: u8) -> Option<Candidate> {
        let tri = self.triangles[t];

        let mut nudged: SmallVec<[(u32, Code); 3]> = SmallVec::new();
        for (slot, &v) in tri.iter().enumerate() {
            let axes = mask >> (2 * slot) & 0b11;
            if axes == 0 {
                continue;
            }
            if self.corrected.contains_key(&v) {
                return None;
            }
            let mut code = self.codes[v as usize];
            for axis in 0..2 {
                if axes & (1 << axis) == 0 {
                    continue;
                }
                let direction = self.directions[v as usize][axis];
                if direction == 0 {
                    return None;
                }
                code[axis] += direction as i64;
                if code[axis] < 0 || code[axis] > self.max_code[axis] {
                    return None;
                }
            }
            nudged.push((v, code));
        }

        let code_of = |v: u32| {
            nudged
                .iter()
                .find(|(n, _)| *n == v)
                .map_or(self.codes[v as usize], |(_, code)| *code)
        };
        let area = |tri: [u32; 3]| cross(code_of(tri[0]), code_of(tri[1]), code_of(tri[2]));

        if area(tri) < 0 {
            return None;
        }

        let mut newly_flipped = Vec::new();
        let mut newly_fixed = Vec::new();
        for &n in &self.adjacency[t] {
            let n = n as usize;
            let neighbor = self.triangles[n];
            if !self.eligible[n] || !neighbor.iter().any(|v| nudged.iter().any(|(m, _)| m == v)) {
                continue;
            }
            let inverted = area(neighbor) < 0;
            match self.states[n] {
                FlipState::Fixed if inverted => return None,
                FlipState::NotFlipped if inverted => newly_flipped.push(n),
                FlipState::Flipped if !inverted => newly_fixed.push(n),
                _ => {}
            }
        }

        Some(Candidate {
            nudged,
            newly_flipped,
            newly_fixed,
        })
    }

    /// Best candidate for triangle `t` in search order
    fn search(&self, t: usize) -> Option<Candidate> {
        let flipped_neighbors = self.adjacency[t]
            .iter()
            .filter(|&&n| self.eligible[n as usize] && self.states[n as usize] == FlipState::Flipped)
            .count();

        let mut best: Option<Candidate> = None;
        for &mask in &self.masks {
            let Some(candidate) = self.evaluate(t, mask) else {
                continue;
            };
            if candidate.is_perfect(flipped_neighbors) {
                return Some(candidate);
            }
            if best.as_ref().is_none_or(|b| candidate.better_than(b)) {
                best = Some(candidate);
            }
        }
        best
    }

    fn apply(&mut self, t: usize, candidate: Candidate) {
        for (v, code) in candidate.nudged {
            self.codes[v as usize] = code;
            self.corrected.insert(v, code);
        }
        self.states[t] = FlipState::Fixed;
        for n in candidate.newly_fixed {
            self.states[n] = FlipState::Fixed;
        }
        for n in candidate.newly_flipped {
            self.states[n] = FlipState::Flipped;
            self.queue.push_back(n);
        }
    }

    /// Run the search; `false` if some triangle could not be repaired
    fn run(&mut self) -> bool {
        while let Some(t) = self.queue.pop_front() {
            if self.states[t] == FlipState::Fixed {
                continue;
            }
            if self.triangles[t].iter().all(|v| self.corrected.contains_key(v)) {
                tracing::debug!(triangle = t, "flipped triangle has no uncorrected vertex");
                return false;
            }
            let Some(candidate) = self.search(t) else {
                tracing::debug!(triangle = t, "no nudge repairs flipped triangle");
                return false;
            };
            tracing::trace!(
                triangle = t,
                vertices = candidate.nudged.len(),
                newly_fixed = candidate.newly_fixed.len(),
                newly_flipped = candidate.newly_flipped.len(),
                "applying nudge"
            );
            self.apply(t, candidate);
        }
        true
    }
}

/// Find position corrections that undo quantization-induced triangle flips
///
/// `positions` are the original (unquantized) vertex positions, `triangles`
/// index into them. `position_type` and `params` describe how positions will
/// be packed. Returns an empty map when the position attribute is unpacked,
/// when nothing is flipped, or when the search gives up.
///
/// Triangles must reference valid vertex indices.
pub fn correct_flipped_triangles(
    positions: &[Vec2],
    triangles: &[[u32; 3]],
    position_type: AttributeType,
    params: &MeshAttributeCodingParams,
) -> CorrectedPositions {
    let bits = position_type.bits_per_component();
    if bits.len() != 2 || params.components.len() != 2 {
        return CorrectedPositions::new();
    }

    let Some(mut correction) = FlipCorrection::new(positions, triangles, params, [bits[0], bits[1]])
    else {
        tracing::debug!("positions outside coding params range, skipping flip correction");
        return CorrectedPositions::new();
    };
    if !correction.needs_correction() {
        return CorrectedPositions::new();
    }

    let flipped = correction.queue.len();
    if !correction.run() {
        tracing::debug!(flipped, "abandoning flipped triangle correction");
        return CorrectedPositions::new();
    }

    tracing::debug!(
        flipped,
        corrected_vertices = correction.corrected.len(),
        "corrected flipped triangles"
    );
    // Codes were range-checked against `max_code` when nudged
    correction
        .corrected
        .iter()
        .map(|(&v, code)| (v, code.map(|c| c as u32)))
        .collect()
}

/// Triangles sharing at least one vertex with each triangle, sorted
fn triangle_adjacency(triangles: &[[u32; 3]], vertex_count: usize) -> Vec<Vec<u32>> {
    let mut vertex_triangles: Vec<Vec<u32>> = vec![Vec::new(); vertex_count];
    for (t, tri) in triangles.iter().enumerate() {
        for &v in tri {
            vertex_triangles[v as usize].push(t as u32);
        }
    }
    triangles
        .iter()
        .enumerate()
        .map(|(t, tri)| {
            let mut neighbors: Vec<u32> = tri
                .iter()
                .flat_map(|&v| vertex_triangles[v as usize].iter().copied())
                .filter(|&n| n as usize != t)
                .collect();
            neighbors.sort_unstable();
            neighbors.dedup();
            neighbors
        })
        .collect()
}
