error_chain!{
    foreign_links {
        Io(::std::io::Error);
    }

    errors {
        InvalidJSON(msg: String) {
            description("invalid JSON")
            display("Could not parse JSON descriptor: {:}", msg)
        }
        InvalidDescriptor(descriptor: &'static str, msg: String) {
            description("invalid descriptor")
            display("Invalid {} descriptor: {:}", descriptor, msg)
        }
        UnsupportedElement(path: String, is_dir: bool) {
            description("unsupported element")
            display("Unsupported element in artifact header: {} (is dir: {})", path, is_dir)
        }
        InvalidElementKind(path: String, expected_dir: bool) {
            description("invalid element kind")
            display("Invalid element kind in artifact header: {} (expected {}, found {})",
                    path, kind_name(*expected_dir), kind_name(!*expected_dir))
        }
        MissingRequiredElement(pattern: String) {
            description("missing required element")
            display("Missing required element in artifact header: {}", pattern)
        }
        TraversalFailure(msg: String) {
            description("traversal failure")
            display("Error while walking artifact header: {:}", msg)
        }
        ReadError(msg: String) {
            description("read error")
            display("Error while reading artifact header: {:}", msg)
        }
        InvalidSchema(msg: String) {
            description("invalid schema")
            display("Invalid header schema: {:}", msg)
        }
        Cancelled {
            description("validation cancelled")
            display("Header validation has been cancelled")
        }
    }
}

fn kind_name(is_dir: bool) -> &'static str {
    if is_dir { "directory" } else { "file" }
}
