use std::collections::HashMap;

/// Issued when a ranking request starts; used to decide whether its result is still wanted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestToken {
	pub surface: String,
	pub fingerprint: String,
	pub sequence: u64,
}

#[derive(Debug, Default)]
struct SurfaceState {
	fingerprint: String,
	sequence: u64,
	last_signature: Option<String>,
}

/// Latest request and last presented order per logical surface.
#[derive(Debug, Default)]
pub struct SurfaceTracker {
	surfaces: HashMap<String, SurfaceState>,
	next_sequence: u64,
}
impl SurfaceTracker {
	pub fn begin(&mut self, surface: &str, fingerprint: &str) -> RequestToken {
		self.next_sequence += 1;

		let state = self.surfaces.entry(surface.to_string()).or_default();

		state.fingerprint = fingerprint.to_string();
		state.sequence = self.next_sequence;

		RequestToken {
			surface: surface.to_string(),
			fingerprint: fingerprint.to_string(),
			sequence: self.next_sequence,
		}
	}

	/// A result is current while no request with a different fingerprint started after it.
	/// Repeats of the same request stay current.
	pub fn is_current(&self, token: &RequestToken) -> bool {
		self.surfaces
			.get(&token.surface)
			.is_some_and(|state| state.fingerprint == token.fingerprint)
	}

	/// Stores `signature` as the surface's presented order. Returns false when it is unchanged.
	pub fn record_signature(&mut self, token: &RequestToken, signature: &str) -> bool {
		let Some(state) = self.surfaces.get_mut(&token.surface) else { return false };

		if state.last_signature.as_deref() == Some(signature) {
			return false;
		}

		state.last_signature = Some(signature.to_string());

		true
	}

	/// Forgets the presented order, so the next successful ranking is emitted again.
	pub fn clear(&mut self, surface: &str) {
		if let Some(state) = self.surfaces.get_mut(surface) {
			state.last_signature = None;
		}
	}

	pub fn last_signature(&self, surface: &str) -> Option<&str> {
		self.surfaces.get(surface).and_then(|state| state.last_signature.as_deref())
	}
}
