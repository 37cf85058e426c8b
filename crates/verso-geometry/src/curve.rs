//! Cubic Bézier segments.

use crate::{Anchor, DrawingInstruction, Vector, EPSILON};

/// Legendre-Gauss abscissae for n = 24.
const T_VALUES: [f64; 24] = [
    -0.0640568928626056260850430826247450385909,
    0.0640568928626056260850430826247450385909,
    -0.1911188674736163091586398207570696318404,
    0.1911188674736163091586398207570696318404,
    -0.3150426796961633743867932913198102407864,
    0.3150426796961633743867932913198102407864,
    -0.4337935076260451384870842319133497124524,
    0.4337935076260451384870842319133497124524,
    -0.5454214713888395356583756172183723700107,
    0.5454214713888395356583756172183723700107,
    -0.6480936519369755692524957869107476266696,
    0.6480936519369755692524957869107476266696,
    -0.7401241915785543642438281030999784255232,
    0.7401241915785543642438281030999784255232,
    -0.8200019859739029219539498726697452080761,
    0.8200019859739029219539498726697452080761,
    -0.8864155270044010342131543419821967550873,
    0.8864155270044010342131543419821967550873,
    -0.9382745520027327585236490017087214496548,
    0.9382745520027327585236490017087214496548,
    -0.9747285559713094981983919930081690617411,
    0.9747285559713094981983919930081690617411,
    -0.9951872199970213601799974097007368118745,
    0.9951872199970213601799974097007368118745,
];

/// Legendre-Gauss weights matching [`T_VALUES`].
const C_VALUES: [f64; 24] = [
    0.1279381953467521569740561652246953718517,
    0.1279381953467521569740561652246953718517,
    0.1258374563468282961213753825111836887264,
    0.1258374563468282961213753825111836887264,
    0.121670472927803391204463153476262425607,
    0.121670472927803391204463153476262425607,
    0.1155056680537256013533444839067835598622,
    0.1155056680537256013533444839067835598622,
    0.1074442701159656347825773424466062227946,
    0.1074442701159656347825773424466062227946,
    0.0976186521041138882698806644642471544279,
    0.0976186521041138882698806644642471544279,
    0.086190161531953275917185202983742667185,
    0.086190161531953275917185202983742667185,
    0.0733464814110803057340336152531165181193,
    0.0733464814110803057340336152531165181193,
    0.0592985849154367807463677585001085845412,
    0.0592985849154367807463677585001085845412,
    0.0442774388174198061686027482113382288593,
    0.0442774388174198061686027482113382288593,
    0.0285313886289336631813078159518782864491,
    0.0285313886289336631813078159518782864491,
    0.0123412297999871995468056670700372915759,
    0.0123412297999871995468056670700372915759,
];

/// A cubic Bézier curve between two anchors.
///
/// Missing handles collapse onto their anchor point, so a curve between two
/// handle-less anchors is a straight segment. The first and second derivative
/// control polygons and the arc length are computed once on construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    points: [Vector; 4],
    first: [Vector; 3],
    second: [Vector; 2],
    length: f64,
}

impl Curve {
    pub fn new(from: &Anchor, to: &Anchor) -> Self {
        Self::from_points([
            from.point,
            from.handle_out.unwrap_or(from.point),
            to.handle_in.unwrap_or(to.point),
            to.point,
        ])
    }

    pub fn from_points(points: [Vector; 4]) -> Self {
        let first = [
            (points[1] - points[0]) * 3.0,
            (points[2] - points[1]) * 3.0,
            (points[3] - points[2]) * 3.0,
        ];
        let second = [(first[1] - first[0]) * 2.0, (first[2] - first[1]) * 2.0];

        let mut curve = Self {
            points,
            first,
            second,
            length: 0.0,
        };
        curve.length = curve.integrate_length();
        curve
    }

    pub fn points(&self) -> &[Vector; 4] {
        &self.points
    }

    pub fn start(&self) -> Vector {
        self.points[0]
    }

    pub fn end(&self) -> Vector {
        self.points[3]
    }

    pub fn point_at(&self, t: f64) -> Vector {
        bezier_point(t, &self.points)
    }

    /// First derivative at `t`.
    pub fn derivative(&self, t: f64) -> Vector {
        bezier_point(t, &self.first)
    }

    pub fn tangent_at(&self, t: f64) -> Vector {
        self.derivative(t).normalize()
    }

    pub fn normal_at(&self, t: f64) -> Vector {
        let tangent = self.tangent_at(t);
        Vector::new(-tangent.y, tangent.x)
    }

    /// Signed curvature at `t`, `0` where it is undefined.
    pub fn curvature_at(&self, t: f64) -> f64 {
        let (num, dnm) = self.curvature_terms(t);
        if num == 0.0 || dnm == 0.0 {
            return 0.0;
        }
        num / dnm
    }

    /// Signed radius of curvature at `t`, `0` where it is undefined.
    pub fn radius_at(&self, t: f64) -> f64 {
        let (num, dnm) = self.curvature_terms(t);
        if num == 0.0 || dnm == 0.0 {
            return 0.0;
        }
        dnm / num
    }

    fn curvature_terms(&self, t: f64) -> (f64, f64) {
        let d = self.derivative(t);
        let dd = bezier_point(t, &self.second);
        let num = d.x * dd.y - d.y * dd.x;
        let dnm = d.dot(d).powf(1.5);
        (num, dnm)
    }

    /// Arc length.
    pub fn length(&self) -> f64 {
        self.length
    }

    fn integrate_length(&self) -> f64 {
        let z = 0.5;
        let sum: f64 = T_VALUES
            .iter()
            .zip(C_VALUES.iter())
            .map(|(x, w)| w * self.derivative(z * x + z).length())
            .sum();
        z * sum
    }

    /// Whether every control point lies within [`EPSILON`] of the chord.
    pub fn is_linear(&self) -> bool {
        let origin = self.start();
        let chord = self.end() - origin;
        let angle = -chord.y.atan2(chord.x);
        let (sin, cos) = angle.sin_cos();

        self.points.iter().all(|p| {
            let v = *p - origin;
            (v.x * sin + v.y * cos).abs() < EPSILON
        })
    }

    pub fn to_instruction(&self) -> DrawingInstruction {
        if self.is_linear() {
            DrawingInstruction::line_to(self.end())
        } else {
            DrawingInstruction::curve_to(self.points[1], self.points[2], self.points[3])
        }
    }
}

/// Bernstein evaluation for control polygons of degree 0 to 3.
fn bezier_point(t: f64, points: &[Vector]) -> Vector {
    let Some(last) = points.len().checked_sub(1) else {
        return Vector::ZERO;
    };
    if t == 0.0 || last == 0 {
        return points[0];
    }
    if t == 1.0 {
        return points[last];
    }

    let mt = 1.0 - t;
    match last {
        1 => points[0] * mt + points[1] * t,
        2 => points[0] * (mt * mt) + points[1] * (2.0 * mt * t) + points[2] * (t * t),
        _ => {
            let (mt2, t2) = (mt * mt, t * t);
            points[0] * (mt2 * mt)
                + points[1] * (3.0 * mt2 * t)
                + points[2] * (3.0 * mt * t2)
                + points[3] * (t2 * t)
        }
    }
}
