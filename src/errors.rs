// Create the Error, ErrorKind, ResultExt, and Result types.
// Other modules `use crate::errors::*;` to get access to everything `error_chain!` creates.
#![allow(deprecated)]

use error_chain::*;

error_chain! {

    foreign_links {
        Link(crate::grid::CellLinkError);
        Json(::serde_json::Error);
        Image(::image::ImageError);
        Io(::std::io::Error);
    }

    errors {
        InvalidGridDimensions(width: usize, height: usize) {
            description("invalid grid dimensions")
            display("invalid grid dimensions {}x{}, width and height must be positive", width, height)
        }

        InvalidCoordinate(x: u32, y: u32) {
            description("coordinate outside of the grid")
            display("coordinate ({}, {}) is outside of the grid", x, y)
        }

        MalformedGrid(reason: String) {
            description("malformed grid data")
            display("malformed grid data: {}", reason)
        }
    }
}
