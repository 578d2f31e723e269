//! Field table of the UAS Datalink Local Set (tags 1 to 95).
//!
//! `FIELDS[n - 1]` describes tag `n`. The dispatcher only looks fields up
//! here; it holds no per-tag logic of its own.

use super::transform::{Axis, Transform};

/// Name and transform of one local set tag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub tag: u8,
    pub name: &'static str,
    pub transform: Transform,
}

impl FieldSpec {
    const fn new(tag: u8, name: &'static str, transform: Transform) -> Self {
        Self {
            tag,
            name,
            transform,
        }
    }
}

/// Tag carrying microseconds since the Unix epoch.
pub const PRECISION_TIME_STAMP: u8 = 2;

pub const SLANT_RANGE_MAX_M: f64 = 5_000_000.0;
pub const TARGET_WIDTH_MAX_M: f64 = 10_000.0;

const U8: Transform = Transform::FixedUnsigned(1);
const U16: Transform = Transform::FixedUnsigned(2);
const U64: Transform = Transform::FixedUnsigned(8);
const I8: Transform = Transform::FixedSigned(1);
const I16: Transform = Transform::FixedSigned(2);
const I32: Transform = Transform::FixedSigned(4);
const UINT: Transform = Transform::Unsigned;
const TEXT: Transform = Transform::Text;
const LAT: Transform = Transform::Coordinate(Axis::Latitude);
const LON: Transform = Transform::Coordinate(Axis::Longitude);
const ALT: Transform = Transform::Altitude;
const CORNER: Transform = Transform::OffsetCorner;
const BYTES: Transform = Transform::Bytes;
const SET: Transform = Transform::LocalSet;
const HEADING: Transform = angle(0.0, 360.0);
const FOV: Transform = angle(0.0, 180.0);
const PITCH: Transform = angle(-20.0, 20.0);
const ROLL: Transform = angle(-50.0, 50.0);
const HALF_TURN: Transform = angle(-180.0, 180.0);
const SLANT: Transform = Transform::Distance {
    max: SLANT_RANGE_MAX_M,
};
const WIDTH: Transform = Transform::Distance {
    max: TARGET_WIDTH_MAX_M,
};

const fn angle(min: f64, max: f64) -> Transform {
    Transform::Angle { min, max }
}

pub static FIELDS: [FieldSpec; 95] = [
    FieldSpec::new(1, "checksum", U16),
    FieldSpec::new(2, "precision_time_stamp", U64),
    FieldSpec::new(3, "mission_id", TEXT),
    FieldSpec::new(4, "platform_tail_number", TEXT),
    FieldSpec::new(5, "platform_heading_angle", HEADING),
    FieldSpec::new(6, "platform_pitch_angle", PITCH),
    FieldSpec::new(7, "platform_roll_angle", ROLL),
    FieldSpec::new(8, "platform_true_airspeed", UINT),
    FieldSpec::new(9, "platform_indicated_airspeed", UINT),
    FieldSpec::new(10, "platform_designation", TEXT),
    FieldSpec::new(11, "image_source_sensor", TEXT),
    FieldSpec::new(12, "image_coordinate_system", TEXT),
    FieldSpec::new(13, "sensor_latitude", LAT),
    FieldSpec::new(14, "sensor_longitude", LON),
    FieldSpec::new(15, "sensor_true_altitude", ALT),
    FieldSpec::new(16, "sensor_horizontal_fov", FOV),
    FieldSpec::new(17, "sensor_vertical_fov", FOV),
    FieldSpec::new(18, "sensor_relative_azimuth", HEADING),
    FieldSpec::new(19, "sensor_relative_elevation", HALF_TURN),
    FieldSpec::new(20, "sensor_relative_roll", HALF_TURN),
    FieldSpec::new(21, "slant_range", SLANT),
    FieldSpec::new(22, "target_width", WIDTH),
    FieldSpec::new(23, "frame_center_latitude", LAT),
    FieldSpec::new(24, "frame_center_longitude", LON),
    FieldSpec::new(25, "frame_center_elevation", ALT),
    FieldSpec::new(26, "offset_corner_latitude_1", CORNER),
    FieldSpec::new(27, "offset_corner_longitude_1", CORNER),
    FieldSpec::new(28, "offset_corner_latitude_2", CORNER),
    FieldSpec::new(29, "offset_corner_longitude_2", CORNER),
    FieldSpec::new(30, "offset_corner_latitude_3", CORNER),
    FieldSpec::new(31, "offset_corner_longitude_3", CORNER),
    FieldSpec::new(32, "offset_corner_latitude_4", CORNER),
    FieldSpec::new(33, "offset_corner_longitude_4", CORNER),
    FieldSpec::new(34, "icing_detected", U8),
    FieldSpec::new(35, "wind_direction", HEADING),
    FieldSpec::new(36, "wind_speed", UINT),
    FieldSpec::new(37, "static_pressure", UINT),
    FieldSpec::new(38, "density_altitude", ALT),
    FieldSpec::new(39, "outside_air_temperature", I8),
    FieldSpec::new(40, "target_location_latitude", LAT),
    FieldSpec::new(41, "target_location_longitude", LON),
    FieldSpec::new(42, "target_location_elevation", ALT),
    FieldSpec::new(43, "target_track_gate_width", U16),
    FieldSpec::new(44, "target_track_gate_height", U8),
    FieldSpec::new(45, "target_error_estimate_ce90", U16),
    FieldSpec::new(46, "target_error_estimate_le90", U16),
    FieldSpec::new(47, "generic_flag_data", U8),
    FieldSpec::new(48, "security_local_set", SET),
    FieldSpec::new(49, "differential_pressure", UINT),
    FieldSpec::new(50, "platform_angle_of_attack", PITCH),
    FieldSpec::new(51, "platform_vertical_speed", HALF_TURN),
    FieldSpec::new(52, "platform_sideslip_angle", PITCH),
    FieldSpec::new(53, "airfield_barometric_pressure", UINT),
    FieldSpec::new(54, "airfield_elevation", ALT),
    FieldSpec::new(55, "relative_humidity", U8),
    FieldSpec::new(56, "platform_ground_speed", UINT),
    FieldSpec::new(57, "ground_range", SLANT),
    FieldSpec::new(58, "platform_fuel_remaining", U16),
    FieldSpec::new(59, "platform_call_sign", TEXT),
    FieldSpec::new(60, "weapon_load", U16),
    FieldSpec::new(61, "weapon_fired", U16),
    FieldSpec::new(62, "laser_prf_code", UINT),
    FieldSpec::new(63, "sensor_fov_name", U8),
    FieldSpec::new(64, "platform_magnetic_heading", HEADING),
    FieldSpec::new(65, "uas_ls_version_number", U8),
    FieldSpec::new(66, "target_location_covariance", BYTES),
    FieldSpec::new(67, "alternate_platform_latitude", LAT),
    FieldSpec::new(68, "alternate_platform_longitude", LON),
    FieldSpec::new(69, "alternate_platform_altitude", ALT),
    FieldSpec::new(70, "alternate_platform_name", TEXT),
    FieldSpec::new(71, "alternate_platform_heading", HEADING),
    FieldSpec::new(72, "event_start_time_utc", U64),
    FieldSpec::new(73, "rvt_local_set", SET),
    FieldSpec::new(74, "vmti_local_set", SET),
    FieldSpec::new(75, "sensor_ellipsoid_height", ALT),
    FieldSpec::new(76, "alternate_platform_ellipsoid_height", ALT),
    FieldSpec::new(77, "operational_mode", U8),
    FieldSpec::new(78, "frame_center_height_above_ellipsoid", ALT),
    FieldSpec::new(79, "sensor_north_velocity", I16),
    FieldSpec::new(80, "sensor_east_velocity", I16),
    FieldSpec::new(81, "image_horizon_pixel_pack", BYTES),
    FieldSpec::new(82, "corner_latitude_1", LAT),
    FieldSpec::new(83, "corner_longitude_1", LON),
    FieldSpec::new(84, "corner_latitude_2", LAT),
    FieldSpec::new(85, "corner_longitude_2", LON),
    FieldSpec::new(86, "corner_latitude_3", LAT),
    FieldSpec::new(87, "corner_longitude_3", LON),
    FieldSpec::new(88, "corner_latitude_4", LAT),
    FieldSpec::new(89, "corner_longitude_4", LON),
    FieldSpec::new(90, "platform_pitch_angle_full", I32),
    FieldSpec::new(91, "platform_roll_angle_full", I32),
    FieldSpec::new(92, "platform_angle_of_attack_full", I32),
    FieldSpec::new(93, "platform_sideslip_angle_full", I32),
    FieldSpec::new(94, "miis_core_identifier", BYTES),
    FieldSpec::new(95, "sar_motion_imagery_local_set", SET),
];

/// Field description for `tag`, or `None` when the tag is not in the table.
///
/// # Examples
/// ```
/// use klvscope_core::protocols::uas::tags::lookup;
///
/// assert_eq!(lookup(13).unwrap().name, "sensor_latitude");
/// assert!(lookup(0).is_none());
/// assert!(lookup(200).is_none());
/// ```
pub fn lookup(tag: u8) -> Option<&'static FieldSpec> {
    let index = usize::from(tag).checked_sub(1)?;
    FIELDS.get(index).filter(|spec| spec.tag == tag)
}
