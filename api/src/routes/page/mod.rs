pub mod page_render;
pub mod page_route;
