//! UseCase layer: one use case per protocol operation.
//!
//! Each use case owns the registry mutex and (where it fans out) the
//! message pusher. Registry mutations run as one critical section under
//! the mutex; the returned snapshots are broadcast after the lock is
//! released.

pub mod create_room;
pub mod join_room;
pub mod leave_room;
pub mod list_rooms;
pub mod send_message;

pub use create_room::CreateRoomUseCase;
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use list_rooms::ListRoomsUseCase;
pub use send_message::{OutboundMessage, SendMessageUseCase};
