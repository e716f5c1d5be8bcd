//! Fan triangulation of convex polygons.
//!
//! An N-gon becomes N - 2 triangles sharing vertex 0: `(v0, v1, v2)` first,
//! then `(v[i-1], v[i], v0)` for every further vertex. Concave input is not
//! detected and renders with overlapping triangles.

/// Number of triangle-list vertices an `n`-vertex polygon expands to.
///
/// Zero for anything that is not a polygon (`n < 3`).
#[inline]
pub const fn expanded_vertex_count(n: usize) -> usize {
    if n < 3 { 0 } else { 3 + (n - 3) * 3 }
}

/// Source vertex indices of the fan, in emission order.
pub fn fan_indices(n: usize) -> impl Iterator<Item = usize> {
    let first = if n >= 3 { 0..3 } else { 0..0 };
    first.chain((3..n).flat_map(|i| [i - 1, i, 0]))
}

/// Appends the fan expansion of `vertices` (packed records of `stride` bytes)
/// to `out`.
///
/// # Panics
/// Panics if `vertices` is not a whole number of records.
pub fn expand_fan_into(vertices: &[u8], stride: usize, out: &mut Vec<u8>) {
    assert!(stride > 0, "zero vertex stride");
    assert_eq!(vertices.len() % stride, 0, "partial vertex record");

    let n = vertices.len() / stride;
    out.reserve(expanded_vertex_count(n) * stride);
    for i in fan_indices(n) {
        out.extend_from_slice(&vertices[i * stride..(i + 1) * stride]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts() {
        assert_eq!(expanded_vertex_count(2), 0);
        assert_eq!(expanded_vertex_count(3), 3);
        assert_eq!(expanded_vertex_count(4), 6);
        assert_eq!(expanded_vertex_count(5), 9);
        assert_eq!(expanded_vertex_count(8), 18);
    }

    #[test]
    fn quad_is_two_triangles() {
        let idx: Vec<usize> = fan_indices(4).collect();
        assert_eq!(idx, vec![0, 1, 2, 2, 3, 0]);
    }

    #[test]
    fn pentagon_is_three_triangles() {
        let idx: Vec<usize> = fan_indices(5).collect();
        assert_eq!(idx, vec![0, 1, 2, 2, 3, 0, 3, 4, 0]);
    }

    #[test]
    fn expansion_copies_whole_records() {
        // 2-byte records tagged by vertex index.
        let quad = [0, 10, 1, 11, 2, 12, 3, 13];
        let mut out = Vec::new();
        expand_fan_into(&quad, 2, &mut out);
        assert_eq!(out, vec![0, 10, 1, 11, 2, 12, 2, 12, 3, 13, 0, 10]);
    }

    #[test]
    #[should_panic(expected = "partial vertex record")]
    fn ragged_input_panics() {
        expand_fan_into(&[0, 1, 2], 2, &mut Vec::new());
    }
}
