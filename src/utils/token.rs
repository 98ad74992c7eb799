use rand::{distributions::Alphanumeric, thread_rng, Rng};

pub const PUBLIC_ID_LENGTH: usize = 12;

pub fn generate_public_id() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(PUBLIC_ID_LENGTH)
        .map(char::from)
        .collect()
}
