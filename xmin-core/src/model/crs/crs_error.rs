use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrsError {
    #[error("non-finite geographic coordinate (lon={0}, lat={1})")]
    NonFiniteGeographic(f64, f64),
    #[error("non-finite planar coordinate (x={0}, y={1})")]
    NonFinitePlanar(f64, f64),
    #[error("planar coordinate (x={0}, y={1}) outside the projection domain")]
    OutsideProjectionDomain(f64, f64),
}
