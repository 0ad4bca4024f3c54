use crate::defs::Visplane;

/// Turn the per column rows of a plane in to horizontal spans. Each span is
/// passed to `emit` as `(y, x1, x2)`, inclusive.
///
/// Walks the columns left to right comparing each with the one before it.
/// Rows that stop being covered close a span, rows that start being covered
/// open one. The guard columns either side of the extent close everything.
///
/// Doom function name `R_MakeSpans`, with the loop from `R_DrawPlanes`
pub fn make_spans(plane: &mut Visplane, spanstart: &mut [i32], mut emit: impl FnMut(i32, i32, i32)) {
    if plane.is_empty() {
        return;
    }
    plane.set_guards();

    for x in plane.minx..=plane.maxx + 1 {
        let mut t1 = plane.top(x - 1);
        let mut b1 = plane.bottom(x - 1);
        let mut t2 = plane.top(x);
        let mut b2 = plane.bottom(x);

        while t1 < t2 && t1 <= b1 {
            emit(t1 as i32, spanstart[t1 as usize], x - 1);
            t1 += 1;
        }
        while b1 > b2 && b1 >= t1 {
            emit(b1 as i32, spanstart[b1 as usize], x - 1);
            b1 -= 1;
        }
        while t2 < t1 && t2 <= b2 {
            spanstart[t2 as usize] = x;
            t2 += 1;
        }
        while b2 > b1 && b2 >= t2 {
            spanstart[b2 as usize] = x;
            b2 -= 1;
        }
    }
}
