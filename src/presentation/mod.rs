mod components;
mod view;

pub use view::{DialogRender, UiContext, draw};
