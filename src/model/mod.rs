pub mod body;
pub mod camera;
pub mod clock;
pub mod session;
pub mod system;

pub use body::{OrbitParams, Orbiting, RenderBody, TextureId};
pub use camera::{Basis, Camera};
pub use clock::SimClock;
pub use session::{
    Clearance, Command, Control, ControlState, SavedState, Session, SessionConfig, StepOutcome,
};
pub use system::SolarSystem;
