pub mod redraw_requester;
pub mod renderer;
