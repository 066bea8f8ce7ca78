//! Self-rescheduling frame loop over a host's one-shot frame requests.
//!
//! Hosts such as `requestAnimationFrame` only ever deliver one callback per
//! request. [`FrameLoop`] turns that into a continuous loop: every delivered
//! frame runs the tick and then requests the next one, whether or not the
//! tick did any work. Dropping the loop cancels the pending request.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// One-shot frame requests offered by a host.
pub trait FrameHost: 'static {
	/// Host-side form of a frame callback.
	type Callback: 'static;

	/// Wrap `tick` into something the host can invoke.
	fn wrap(&self, tick: Box<dyn FnMut(f64)>) -> Self::Callback;

	/// Ask for `callback` to run once on the next frame. Returns the request id.
	fn request(&self, callback: &Self::Callback) -> Option<i32>;

	/// Withdraw a pending request.
	fn cancel(&self, id: i32);
}

/// A running frame loop, cancelled when dropped.
pub struct FrameLoop<H: FrameHost> {
	host: Rc<H>,
	handle: Rc<Cell<Option<i32>>>,
	callback: Rc<RefCell<Option<H::Callback>>>,
}

impl<H: FrameHost> FrameLoop<H> {
	/// Request the first frame and keep re-requesting after every delivered one.
	///
	/// Returns `None` if the host refuses the first request.
	pub fn start(host: H, mut tick: Box<dyn FnMut(f64)>) -> Option<Self> {
		let host = Rc::new(host);
		let handle: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
		let callback: Rc<RefCell<Option<H::Callback>>> = Rc::new(RefCell::new(None));
		let (handle_inner, callback_inner, host_inner) =
			(handle.clone(), callback.clone(), host.clone());

		let wrapped = host.wrap(Box::new(move |now: f64| {
			tick(now);
			// Re-arm every frame, whether or not a step ran.
			if let Some(ref cb) = *callback_inner.borrow() {
				handle_inner.set(host_inner.request(cb));
			}
		}));
		*callback.borrow_mut() = Some(wrapped);

		let first = callback.borrow().as_ref().and_then(|cb| host.request(cb));
		let Some(first) = first else {
			// Break the closure's reference to itself.
			callback.borrow_mut().take();
			return None;
		};
		handle.set(Some(first));

		Some(Self {
			host,
			handle,
			callback,
		})
	}
}

impl<H: FrameHost> Drop for FrameLoop<H> {
	fn drop(&mut self) {
		if let Some(id) = self.handle.take() {
			self.host.cancel(id);
		}
		let callback = self.callback.borrow_mut().take();
		drop(callback);
	}
}
