mod address;
mod state;

pub use address::{address_of, resolve_address, DEFAULT_VERB_SCOPE, SEPARATOR};
pub use state::{
    decode_world, encode_world, load_world_from_path, save_world_to_path, SaveError, SavedActor,
    SavedScene, SavedTimer, SavedTween, SavedTweenTarget, SavedVerb, SavedWorld, SAVE_VERSION,
};
