pub(crate) mod object_graph;
