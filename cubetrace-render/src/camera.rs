//! Projection and view matrices, and projecting camera rays into the world.

use core::fmt;

use cubetrace::Ray;
use cubetrace::math::{Cube, FreeCoordinate, FreePoint, FreeVector, ImageSize};
use euclid::{Point2D, Transform3D, Vector2D};

/// Unit-of-measure type for vectors in eye space: the camera at the origin looking
/// toward −Z, with +Y up.
#[allow(clippy::exhaustive_enums)]
#[derive(Debug)]
pub enum Eye {}

/// Unit-of-measure type for OpenGL-style normalized device coordinates, ranging from −1
/// to 1 on each axis.
#[allow(clippy::exhaustive_enums)]
#[derive(Debug)]
pub enum Ndc {}

/// Point in normalized device coordinates.
pub type NdcPoint2 = Point2D<FreeCoordinate, Ndc>;

/// Distance to the near clipping plane, where camera rays start.
pub const NEAR_PLANE: FreeCoordinate = 0.01;
/// Distance to the far clipping plane.
pub const FAR_PLANE: FreeCoordinate = 500.0;

/// Reasons a [`Camera`] could not be constructed.
#[derive(Clone, Debug, PartialEq, displaydoc::Display)]
#[non_exhaustive]
pub enum CameraError {
    /// camera position or direction is not finite: eye {eye:?}, forward {forward:?}
    NotFinite {
        /// Requested eye position.
        eye: FreePoint,
        /// Requested viewing direction.
        forward: FreeVector,
    },
    /// camera viewing direction is zero
    ZeroDirection,
    /// viewport size {0:?} has zero area
    EmptyViewport(ImageSize),
    /// field of view {0}° is not between 0° and 180°
    FieldOfView(FreeCoordinate),
    /// view or projection matrix is not invertible
    NotInvertible,
}

impl std::error::Error for CameraError {}

/// A perspective view of the world: eye position and direction, field of view, and the
/// pixel dimensions of the image being rendered.
///
/// Stores the view and projection transforms along with their inverses, which are used
/// to turn every pixel into a [`Ray`].
#[derive(Clone, PartialEq)]
pub struct Camera {
    eye: FreePoint,
    forward: FreeVector,
    fov_y: FreeCoordinate,
    size: ImageSize,
    view: Transform3D<FreeCoordinate, Cube, Eye>,
    projection: Transform3D<FreeCoordinate, Eye, Ndc>,
    view_inverse: Transform3D<FreeCoordinate, Eye, Cube>,
    projection_inverse: Transform3D<FreeCoordinate, Ndc, Eye>,
    ndc_to_world: Transform3D<FreeCoordinate, Ndc, Cube>,
}

impl Camera {
    /// Constructs a camera at `eye` looking in the direction `forward`, with the given
    /// vertical field of view in degrees and an image of the given size.
    ///
    /// Up is +Y, unless `forward` is vertical, in which case it is −Z.
    pub fn looking(
        eye: FreePoint,
        forward: FreeVector,
        fov_y_degrees: FreeCoordinate,
        size: ImageSize,
    ) -> Result<Self, CameraError> {
        if !(eye.to_vector().square_length().is_finite() && forward.square_length().is_finite()) {
            return Err(CameraError::NotFinite { eye, forward });
        }
        if forward.square_length() == 0.0 {
            return Err(CameraError::ZeroDirection);
        }
        if size.width == 0 || size.height == 0 {
            return Err(CameraError::EmptyViewport(size));
        }
        if !(fov_y_degrees > 0.0 && fov_y_degrees < 180.0) {
            return Err(CameraError::FieldOfView(fov_y_degrees));
        }
        let forward = forward.normalize();

        let view = look_at(eye, forward);
        let aspect = FreeCoordinate::from(size.width) / FreeCoordinate::from(size.height);
        let projection = perspective(fov_y_degrees.to_radians(), aspect, NEAR_PLANE, FAR_PLANE);
        let view_inverse = view.inverse().ok_or(CameraError::NotInvertible)?;
        let projection_inverse = projection.inverse().ok_or(CameraError::NotInvertible)?;

        Ok(Self {
            eye,
            forward,
            fov_y: fov_y_degrees,
            size,
            view,
            projection,
            view_inverse,
            projection_inverse,
            ndc_to_world: projection_inverse.then(&view_inverse),
        })
    }

    /// Constructs a camera from angles in degrees: `yaw` turns from +X toward +Z, and
    /// `pitch` tilts up toward +Y.
    pub fn from_yaw_pitch(
        eye: FreePoint,
        yaw_degrees: FreeCoordinate,
        pitch_degrees: FreeCoordinate,
        fov_y_degrees: FreeCoordinate,
        size: ImageSize,
    ) -> Result<Self, CameraError> {
        let (yaw, pitch) = (yaw_degrees.to_radians(), pitch_degrees.to_radians());
        let forward = FreeVector::new(
            pitch.cos() * yaw.cos(),
            pitch.sin(),
            pitch.cos() * yaw.sin(),
        );
        Self::looking(eye, forward, fov_y_degrees, size)
    }

    /// Position of the eye.
    pub fn eye(&self) -> FreePoint {
        self.eye
    }

    /// Unit vector in the viewing direction.
    pub fn forward(&self) -> FreeVector {
        self.forward
    }

    /// Vertical field of view, in degrees.
    pub fn fov_y(&self) -> FreeCoordinate {
        self.fov_y
    }

    /// Size of the image, in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// The transform from world coordinates to eye coordinates.
    pub fn view_matrix(&self) -> Transform3D<FreeCoordinate, Cube, Eye> {
        self.view
    }

    /// The transform from eye coordinates to normalized device coordinates.
    pub fn projection_matrix(&self) -> Transform3D<FreeCoordinate, Eye, Ndc> {
        self.projection
    }

    /// Inverse of [`Camera::view_matrix()`].
    pub fn view_inverse(&self) -> Transform3D<FreeCoordinate, Eye, Cube> {
        self.view_inverse
    }

    /// Inverse of [`Camera::projection_matrix()`].
    pub fn projection_inverse(&self) -> Transform3D<FreeCoordinate, Ndc, Eye> {
        self.projection_inverse
    }

    /// Returns the ray through the given point in normalized device coordinates, starting
    /// at the near plane, with unit-length direction.
    ///
    /// Returns [`None`] if the point cannot be unprojected.
    #[inline]
    pub fn ray_for_ndc(&self, ndc: NdcPoint2) -> Option<Ray> {
        let near = self
            .ndc_to_world
            .transform_point3d(euclid::point3(ndc.x, ndc.y, -1.0))?;
        let far = self
            .ndc_to_world
            .transform_point3d(euclid::point3(ndc.x, ndc.y, 1.0))?;
        Ray::new(near, far - near).normalized()
    }

    /// Converts a pixel position to normalized device coordinates.
    ///
    /// Row 0 is the bottom of the image. `offset` is the position within the pixel, where
    /// `(0.5, 0.5)` is its center.
    #[inline]
    pub fn pixel_to_ndc(&self, x: u32, y: u32, offset: Vector2D<FreeCoordinate, Ndc>) -> NdcPoint2 {
        NdcPoint2::new(
            (FreeCoordinate::from(x) + offset.x) / FreeCoordinate::from(self.size.width) * 2.0
                - 1.0,
            (FreeCoordinate::from(y) + offset.y) / FreeCoordinate::from(self.size.height) * 2.0
                - 1.0,
        )
    }

    /// Returns the ray through the given position within the given pixel.
    /// See [`Camera::pixel_to_ndc()`].
    #[inline]
    pub fn ray_for_pixel(
        &self,
        x: u32,
        y: u32,
        offset: Vector2D<FreeCoordinate, Ndc>,
    ) -> Option<Ray> {
        self.ray_for_ndc(self.pixel_to_ndc(x, y, offset))
    }
}

impl fmt::Debug for Camera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Camera")
            .field("eye", &self.eye)
            .field("forward", &self.forward)
            .field("fov_y", &self.fov_y)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// Offset of the center of a pixel, for use with [`Camera::ray_for_pixel()`].
pub const PIXEL_CENTER: Vector2D<FreeCoordinate, Ndc> = Vector2D::new(0.5, 0.5);

/// Right-handed view transform for an eye at `eye` looking along unit vector `forward`.
fn look_at(eye: FreePoint, forward: FreeVector) -> Transform3D<FreeCoordinate, Cube, Eye> {
    let mut side = forward.cross(FreeVector::new(0.0, 1.0, 0.0));
    if side.square_length() < 1e-12 {
        side = forward.cross(FreeVector::new(0.0, 0.0, -1.0));
    }
    let s = side.normalize();
    let u = s.cross(forward);
    let f = forward;
    let e = eye.to_vector();

    // Rows are the images of the basis vectors (euclid transforms row vectors).
    #[rustfmt::skip]
    let view = Transform3D::new(
        s.x, u.x, -f.x, 0.0,
        s.y, u.y, -f.y, 0.0,
        s.z, u.z, -f.z, 0.0,
        -s.dot(e), -u.dot(e), f.dot(e), 1.0,
    );
    view
}

/// OpenGL-style perspective projection.
fn perspective(
    fov_y: FreeCoordinate,
    aspect: FreeCoordinate,
    near: FreeCoordinate,
    far: FreeCoordinate,
) -> Transform3D<FreeCoordinate, Eye, Ndc> {
    let f = 1.0 / (fov_y / 2.0).tan();
    let depth = near - far;
    #[rustfmt::skip]
    let projection = Transform3D::new(
        f / aspect, 0.0, 0.0, 0.0,
        0.0, f, 0.0, 0.0,
        0.0, 0.0, (far + near) / depth, -1.0,
        0.0, 0.0, 2.0 * far * near / depth, 0.0,
    );
    projection
}
