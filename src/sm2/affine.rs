use crate::error::{GmError, Result};
use crate::sm2::elem::{
    elem_add, elem_inv_sqr, elem_mul, FieldElem,
};
use crate::sm2::param::CurveCtx;
use crate::sm2::public::{Point, BN_LENGTH};
use num_traits::Zero;

pub(crate) fn big_endian_affine_from_jacobian(
    point: &Point,
    cctx: &CurveCtx,
) -> Result<([u8; BN_LENGTH], [u8; BN_LENGTH])> {
    let (x_aff, y_aff) = affine_from_jacobian(point, cctx)?;
    Ok((x_aff.bytes_less_safe(), y_aff.bytes_less_safe()))
}

pub(crate) fn affine_from_jacobian(
    point: &Point,
    cctx: &CurveCtx,
) -> Result<(FieldElem, FieldElem)> {
    let z = point.point_z();
    if z.is_zero() {
        tracing::debug!(target: "gmsm::sm2", "conversion of the point at infinity");
        return Err(GmError::InvalidPoint);
    }

    let x = FieldElem::from_inner(point.point_x());
    let y = FieldElem::from_inner(point.point_y());
    let z = FieldElem::from_inner(z);

    let zz_inv = elem_inv_sqr(&z, cctx);

    let x_aff = elem_mul(&x, &zz_inv, cctx);

    let y_aff = {
        let zzzz_inv = elem_mul(&zz_inv, &zz_inv, cctx);
        let zzz_inv = elem_mul(&z, &zzzz_inv, cctx);
        elem_mul(&y, &zzz_inv, cctx)
    };

    let a = FieldElem::from_inner(cctx.a.clone());
    let b = FieldElem::from_inner(cctx.b.clone());
    verify_affine_point_is_on_the_curve((&x_aff, &y_aff), &a, &b, cctx)?;

    Ok((x_aff, y_aff))
}

pub(crate) fn verify_jacobian_point_is_on_the_curve(
    point: &Point,
    cctx: &CurveCtx,
) -> Result<()> {
    let z = point.point_z();
    if z.is_zero() {
        return Err(GmError::InvalidPoint);
    }

    let x = FieldElem::from_inner(point.point_x());
    let y = FieldElem::from_inner(point.point_y());
    let z = FieldElem::from_inner(z);

    // The curve equation scaled by z^6:
    // (y/z^3)^2 == (x/z^2)^3 + a*(x/z^2) + b
    //     y^2   ==     x^3   + (a*z^4)*x + b*z^6
    let z2 = elem_mul(&z, &z, cctx);
    let z4 = elem_mul(&z2, &z2, cctx);
    let z4_a = elem_mul(&z4, &FieldElem::from_inner(cctx.a.clone()), cctx);
    let z6 = elem_mul(&z4, &z2, cctx);
    let z6_b = elem_mul(&z6, &FieldElem::from_inner(cctx.b.clone()), cctx);

    verify_affine_point_is_on_the_curve((&x, &y), &z4_a, &z6_b, cctx)
}

pub(crate) fn verify_affine_point_is_on_the_curve(
    (x, y): (&FieldElem, &FieldElem),
    a: &FieldElem,
    b: &FieldElem,
    cctx: &CurveCtx,
) -> Result<()> {
    let lhs = elem_mul(y, y, cctx);

    let x2 = elem_mul(x, x, cctx);
    let x2_a = elem_add(&x2, a, cctx);
    let x2_a_x = elem_mul(&x2_a, x, cctx);
    let rhs = elem_add(&x2_a_x, b, cctx);

    if !lhs.is_equal(&rhs) {
        tracing::debug!(target: "gmsm::sm2", "point fails the curve equation");
        return Err(GmError::InvalidPoint);
    }
    Ok(())
}
