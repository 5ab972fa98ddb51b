//! Human-readable derivation of the motion model.
//!
//! The report only formats values read from [`MotionCoefficients`]; it never
//! recomputes a coefficient. The integral check printed at the end is prose,
//! the numeric check is [`integral_round_trip`].

use crate::model::MotionCoefficients;
use crate::position::PositionEvaluator;
use ndarray::ArrayView1;
use std::fmt::{self, Write};

const RULE: &str = "--------------------------------";

pub const HEADER: &str = "derivation of position, velocity and acceleration";

#[derive(Debug, Clone, Copy)]
pub struct DerivationReport<'a, F: nalgebra::Scalar> {
    coeffs: &'a MotionCoefficients<F>,
    precision: usize,
}

impl<'a, F: crate::Float> DerivationReport<'a, F> {
    pub fn new(coeffs: &'a MotionCoefficients<F>, precision: usize) -> Self {
        Self { coeffs, precision }
    }

    /// Full report: inputs, symbolic formulas, expanded coefficients,
    /// derivatives and the integral check.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Short window / position / velocity / acceleration overview.
    pub fn summary(&self) -> String {
        Summary(*self).to_string()
    }

    fn num(&self, v: F) -> String {
        format!("{:.*}", self.precision, v)
    }

    fn write_report<W: Write>(&self, out: &mut W) -> fmt::Result {
        let k = self.coeffs;
        let w = k.window();
        let (start, end) = (k.start(), k.end());
        let n = |v: F| self.num(v);

        writeln!(out, "{}", HEADER)?;
        writeln!(out, "{}", RULE)?;

        writeln!(out, "variables and values")?;
        writeln!(out, "{}", RULE)?;
        writeln!(out, "f0 = {}  f1 = {}  fps = {}", w.f0(), w.f1(), n(w.fps()))?;
        writeln!(out, "t0 = {}  t1 = {}  T = {}", n(w.t0()), n(w.t1()), n(w.duration()))?;
        writeln!(out, "x0 = {}  y0 = {}  z0 = {}", n(start.x), n(start.y), n(start.z))?;
        writeln!(out, "x1 = {}  y1 = {}  z1 = {}", n(end.x), n(end.y), n(end.z))?;
        writeln!(out, "g  = {}", n(k.gravity()))?;
        writeln!(out)?;

        writeln!(out, "symbolic formulas")?;
        writeln!(out, "{}", RULE)?;
        writeln!(out, "for t in [t0, t1]:")?;
        writeln!(out, "x(t) = x0 + (x1 - x0) * (t - t0) / T")?;
        writeln!(out, "y(t) = y0 + (y1 - y0) * (t - t0) / T")?;
        writeln!(
            out,
            "z(t) = z0 + (z1 - z0) * (t - t0) / T + 0.5 * g * T * (t - t0) - 0.5 * g * (t - t0)^2"
        )?;
        writeln!(out, "equivalently: z(t) = a * t^2 + b * t + c")?;
        writeln!(out, "outside the flight: t <= t0 uses (x0, y0, z0), t >= t1 uses (x1, y1, z1)")?;
        writeln!(out)?;

        writeln!(out, "expansions and coefficients")?;
        writeln!(out, "{}", RULE)?;
        for (axis, m, q) in [("x", k.m_x(), k.q_x()), ("y", k.m_y(), k.q_y())] {
            writeln!(out, "{}(t):", axis)?;
            writeln!(out, "  {a}(t) = {a}0 + ({a}1 - {a}0)/T * (t - t0)", a = axis)?;
            writeln!(
                out,
                "       = [({a}1 - {a}0)/T] * t + [{a}0 - ({a}1 - {a}0)/T * t0]",
                a = axis
            )?;
            writeln!(
                out,
                "  where m_{a} = ({a}1 - {a}0)/T = {m}  and  q_{a} = {a}0 - m_{a} * t0 = {q}",
                a = axis,
                m = n(m),
                q = n(q)
            )?;
            writeln!(out, "  so {}(t) = {} * t + {}", axis, n(m), n(q))?;
            writeln!(out)?;
        }

        writeln!(out, "z(t):")?;
        writeln!(
            out,
            "  start from z = z0 + (z1 - z0)/T * (t - t0) + 0.5*g*T*(t - t0) - 0.5*g*(t - t0)^2"
        )?;
        writeln!(out, "  expand (t - t0)^2 = t^2 - 2*t0*t + t0^2")?;
        writeln!(out, "  collecting into z(t) = a*t^2 + b*t + c:")?;
        writeln!(out, "    a = -0.5*g")?;
        writeln!(out, "    b = (z1 - z0)/T + 0.5*g*T + g*t0")?;
        writeln!(out, "    c = z0 - [(z1 - z0)/T + 0.5*g*T]*t0 - 0.5*g*t0^2")?;
        writeln!(out, "  values: a = {}  b = {}  c = {}", n(k.a()), n(k.b()), n(k.c()))?;
        writeln!(out, "  so z(t) = {} * t^2 + {} * t + {}", n(k.a()), n(k.b()), n(k.c()))?;
        writeln!(out)?;

        writeln!(out, "differentiation: velocity and acceleration")?;
        writeln!(out, "{}", RULE)?;
        writeln!(out, "for t in [t0, t1):")?;
        writeln!(out, "  vx(t) = dx/dt = m_x = {}", n(k.m_x()))?;
        writeln!(out, "  vy(t) = dy/dt = m_y = {}", n(k.m_y()))?;
        writeln!(out, "  vz(t) = dz/dt = 2*a*t + b = {}*t + {}", n(k.accel_z()), n(k.b()))?;
        writeln!(out, "outside that interval the ball is at rest, v(t) = 0")?;
        writeln!(out)?;
        writeln!(out, "speed:")?;
        writeln!(out, "  |v(t)| = sqrt( vx(t)^2 + vy(t)^2 + vz(t)^2 )")?;
        writeln!(
            out,
            "         = sqrt( {}^2 + {}^2 + ( {}*t + {} )^2 )",
            n(k.m_x()),
            n(k.m_y()),
            n(k.accel_z()),
            n(k.b())
        )?;
        writeln!(out)?;
        writeln!(out, "acceleration:")?;
        writeln!(out, "  ax(t) = 0")?;
        writeln!(out, "  ay(t) = 0")?;
        writeln!(out, "  az(t) = d/dt[vz(t)] = 2*a = {}  i.e. -g", n(k.accel_z()))?;
        writeln!(out)?;

        writeln!(out, "integral check")?;
        writeln!(out, "{}", RULE)?;
        writeln!(out, "  integrating vz(t) = 2*a*t + b:  int vz dt = a*t^2 + b*t + C")?;
        writeln!(out, "  imposing z(t0) = z0 gives C = c, hence z(t) = a*t^2 + b*t + c")?;
        writeln!(out, "  likewise for x and y:  int vx dt = m_x*t + Cx, with Cx = q_x")?;

        Ok(())
    }

    fn write_summary<W: Write>(&self, out: &mut W) -> fmt::Result {
        let k = self.coeffs;
        let w = k.window();
        let n = |v: F| self.num(v);

        writeln!(out, "DERIVATION SUMMARY")?;
        writeln!(out, "{}", "=".repeat(50))?;
        writeln!(
            out,
            "flight window: t in [{:.3}, {:.3}] s (duration: {:.3} s)",
            w.t0(),
            w.t1(),
            w.duration()
        )?;
        writeln!(out)?;
        writeln!(out, "POSITION:")?;
        writeln!(out, "  x(t) = {} * t + {}", n(k.m_x()), n(k.q_x()))?;
        writeln!(out, "  y(t) = {} * t + {}", n(k.m_y()), n(k.q_y()))?;
        writeln!(out, "  z(t) = {} * t^2 + {} * t + {}", n(k.a()), n(k.b()), n(k.c()))?;
        writeln!(out)?;
        writeln!(out, "VELOCITY:")?;
        writeln!(out, "  vx(t) = {} m/s", n(k.m_x()))?;
        writeln!(out, "  vy(t) = {} m/s", n(k.m_y()))?;
        writeln!(out, "  vz(t) = {} * t + {} m/s", n(k.accel_z()), n(k.b()))?;
        writeln!(out)?;
        writeln!(out, "ACCELERATION:")?;
        writeln!(out, "  ax(t) = 0 m/s^2")?;
        writeln!(out, "  ay(t) = 0 m/s^2")?;
        writeln!(out, "  az(t) = {} m/s^2 (constant = -g)", n(k.accel_z()))?;

        Ok(())
    }
}

impl<'a, F: crate::Float> fmt::Display for DerivationReport<'a, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_report(f)
    }
}

struct Summary<'a, F: nalgebra::Scalar>(DerivationReport<'a, F>);

impl<'a, F: crate::Float> fmt::Display for Summary<'a, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.write_summary(f)
    }
}

/// Largest gap between the position rebuilt by integrating the velocity from
/// `t0` (plus the start point) and the evaluated position, over the query
/// times inside `[t0, t1]`.
pub fn integral_round_trip<F: crate::Float>(
    coeffs: &MotionCoefficients<F>,
    times: ArrayView1<'_, F>,
) -> F {
    let w = coeffs.window();
    let start = coeffs.start();
    let eval = PositionEvaluator::new(coeffs);
    let (t0, t1) = (w.t0(), w.t1());

    let mut worst = F::zero();
    for &t in times.iter().filter(|&&t| t >= t0 && t <= t1) {
        let dt = t - t0;
        let rebuilt = [
            start.x + coeffs.m_x() * dt,
            start.y + coeffs.m_y() * dt,
            start.z + coeffs.a() * (t * t - t0 * t0) + coeffs.b() * dt,
        ];

        let p = eval.position_at(t);
        for (r, e) in rebuilt.iter().zip([p.x, p.y, p.z]) {
            worst = num_traits::Float::max(worst, num_traits::Float::abs(*r - e));
        }
    }

    worst
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MotionModel;
    use crate::window::FlightWindow;
    use nalgebra as na;
    use ndarray::Array1;

    fn coeffs() -> MotionCoefficients<f64> {
        let window = FlightWindow::new(10, 40, 30.0, 1e-9).unwrap();

        MotionModel::default().derive(
            window,
            na::Point3::new(0.0, 7.0, 2.0),
            na::Point3::new(6.0, 6.0, 0.0),
        )
    }

    #[test]
    fn report_sections_in_order() {
        let k = coeffs();
        let text = DerivationReport::new(&k, 6).render();

        let sections = [
            HEADER,
            "variables and values",
            "symbolic formulas",
            "expansions and coefficients",
            "differentiation: velocity and acceleration",
            "integral check",
        ];

        let mut last = 0;
        for s in sections {
            let pos = text[last..].find(s).map(|p| p + last);
            assert!(pos.is_some(), "missing section {:?}", s);
            last = pos.unwrap();
        }
    }

    #[test]
    fn printed_values_come_from_coefficients() {
        let k = coeffs();
        let text = DerivationReport::new(&k, 6).render();

        assert!(text.contains("f0 = 10  f1 = 40  fps = 30.000000"));
        assert!(text.contains(&format!("values: a = {:.6}  b = {:.6}  c = {:.6}", k.a(), k.b(), k.c())));
        assert!(text.contains(&format!("so x(t) = {:.6} * t + {:.6}", k.m_x(), k.q_x())));
        assert!(text.contains(&format!("vz(t) = dz/dt = 2*a*t + b = {:.6}*t + {:.6}", k.accel_z(), k.b())));
        assert!(text.contains("2*a = -9.810000"));
    }

    #[test]
    fn render_is_deterministic() {
        let k = coeffs();
        let report = DerivationReport::new(&k, 4);

        assert_eq!(report.render(), report.render());
        assert_eq!(report.render(), report.to_string());
        assert!(report.render().contains("g  = 9.8100"));
    }

    #[test]
    fn summary_lists_velocity() {
        let k = coeffs();
        let text = DerivationReport::new(&k, 3).summary();

        assert!(text.starts_with("DERIVATION SUMMARY"));
        assert!(text.contains("flight window: t in [0.333, 1.333] s (duration: 1.000 s)"));
        assert!(text.contains("az(t) = -9.810 m/s^2"));
        assert!(text.ends_with("m/s^2 (constant = -g)\n"));
        assert_eq!(text.lines().count(), 18);
    }

    #[test]
    fn full_text_reaches_the_integral_check() {
        let k = coeffs();
        let text = DerivationReport::new(&k, 6).render();

        assert!(text.starts_with(HEADER));
        assert!(text.ends_with("with Cx = q_x\n"));
    }

    #[test]
    fn round_trip_residual_is_tiny() {
        let k = coeffs();
        let (t0, t1) = (k.window().t0(), k.window().t1());
        let times = Array1::linspace(t0, t1, 101);

        assert!(integral_round_trip(&k, times.view()) < 1e-9);
    }
}
