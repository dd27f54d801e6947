use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::project::SuffixMode;

/// Length of every generated suffix
pub const SUFFIX_LENGTH: usize = 8;
/// Characters a suffix is drawn from
pub const SUFFIX_CHARSET: &[u8; 36] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Produces the suffixes appended to generated function and advancement names.
/// Uniqueness against already used names is checked by the datapack, not here
pub struct NameGenerator {
	source: SuffixSource,
}

enum SuffixSource {
	Rng(StdRng),
	Counter(u64),
}

impl NameGenerator {
	pub fn new(mode: SuffixMode) -> Self {
		let source = match mode {
			SuffixMode::Seeded(seed) => SuffixSource::Rng(StdRng::seed_from_u64(seed)),
			SuffixMode::Random => SuffixSource::Rng(StdRng::from_entropy()),
			SuffixMode::Sequential => SuffixSource::Counter(0),
		};
		Self { source }
	}

	pub fn next_suffix(&mut self) -> String {
		match &mut self.source {
			SuffixSource::Rng(rng) => (0..SUFFIX_LENGTH)
				.map(|_| SUFFIX_CHARSET[rng.gen_range(0..SUFFIX_CHARSET.len())] as char)
				.collect(),
			SuffixSource::Counter(idx) => {
				let out = get_counter_suffix(*idx);
				*idx += 1;
				out
			}
		}
	}
}

/// Encodes a counter in the suffix charset, most significant digit first,
/// padded with the zero digit to the full suffix length
fn get_counter_suffix(idx: u64) -> String {
	let base = SUFFIX_CHARSET.len() as u64;
	let mut idx = idx;
	let mut out = vec![SUFFIX_CHARSET[0]; SUFFIX_LENGTH];
	for slot in out.iter_mut().rev() {
		*slot = SUFFIX_CHARSET[(idx % base) as usize];
		idx /= base;
	}

	out.into_iter().map(char::from).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_counter_suffixes() {
		assert_eq!(get_counter_suffix(0), "aaaaaaaa");
		assert_eq!(get_counter_suffix(1), "aaaaaaab");
		assert_eq!(get_counter_suffix(35), "aaaaaaa9");
		assert_eq!(get_counter_suffix(36), "aaaaaaba");

		let mut names = NameGenerator::new(SuffixMode::Sequential);
		assert_eq!(names.next_suffix(), "aaaaaaaa");
		assert_eq!(names.next_suffix(), "aaaaaaab");
	}

	#[test]
	fn test_seeded_is_reproducible() {
		let mut left = NameGenerator::new(SuffixMode::Seeded(42));
		let mut right = NameGenerator::new(SuffixMode::Seeded(42));
		for _ in 0..16 {
			let suffix = left.next_suffix();
			assert_eq!(suffix.len(), SUFFIX_LENGTH);
			assert!(suffix.bytes().all(|x| SUFFIX_CHARSET.contains(&x)));
			assert_eq!(suffix, right.next_suffix());
		}
	}
}
