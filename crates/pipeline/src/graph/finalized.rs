use std::{collections::VecDeque, fmt::Debug};

use super::graph::{Graph, GraphEdgeIdx, GraphNodeIdx};

/// An immutable directed graph with parallel edges.
/// This is guaranteed to have no directed cycles.
///
/// All read operations are fast.
pub(crate) struct FinalizedGraph<NodeType, EdgeType>
where
	NodeType: Debug,
	EdgeType: Debug,
{
	/// The graph data
	graph: Graph<NodeType, EdgeType>,

	/// An array of edge idx, grouped by start node.
	/// Redundant, but makes reads faster.
	edge_map_out: Vec<Vec<GraphEdgeIdx>>,

	/// An array of edge idx, grouped by end node.
	/// Redundant, but makes reads faster.
	edge_map_in: Vec<Vec<GraphEdgeIdx>>,
}

impl<NodeType, EdgeType> Debug for FinalizedGraph<NodeType, EdgeType>
where
	NodeType: Debug,
	EdgeType: Debug,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FinalizedGraph")
			.field("nodes", &self.graph.nodes)
			.field("edges", &self.graph.edges)
			.finish()
	}
}

impl<NodeType, EdgeType> Graph<NodeType, EdgeType>
where
	NodeType: Debug,
	EdgeType: Debug,
{
	/// Convert this graph to an immutable structure with fast reads.
	/// The caller must have checked for cycles already.
	pub fn finalize(self) -> FinalizedGraph<NodeType, EdgeType> {
		let mut edge_map_in = (0..self.len_nodes()).map(|_| Vec::new()).collect::<Vec<_>>();
		let mut edge_map_out = (0..self.len_nodes()).map(|_| Vec::new()).collect::<Vec<_>>();
		for (i, (from, to, _)) in self.iter_edges().enumerate() {
			edge_map_out[usize::from(*from)].push(GraphEdgeIdx(i));
			edge_map_in[usize::from(*to)].push(GraphEdgeIdx(i));
		}

		FinalizedGraph {
			graph: self,
			edge_map_in,
			edge_map_out,
		}
	}
}

#[allow(dead_code)]
impl<NodeType, EdgeType> FinalizedGraph<NodeType, EdgeType>
where
	NodeType: Debug,
	EdgeType: Debug,
{
	/// Get a node by index
	#[inline]
	pub fn get_node(&self, node_idx: GraphNodeIdx) -> &NodeType {
		self.graph.get_node(node_idx)
	}

	/// The number of nodes in this graph
	#[inline]
	pub fn len_nodes(&self) -> usize {
		self.graph.len_nodes()
	}

	/// Iterate over all nodes in this graph, in insertion order
	#[inline]
	pub fn iter_nodes(&self) -> impl Iterator<Item = &NodeType> {
		self.graph.iter_nodes()
	}

	/// Iterate over all nodes in this graph, including node index
	#[inline]
	pub fn iter_nodes_idx(&self) -> impl Iterator<Item = (GraphNodeIdx, &NodeType)> {
		self.graph.iter_nodes_idx()
	}

	/// Get an edge by index
	#[inline]
	pub fn get_edge(&self, edge_idx: GraphEdgeIdx) -> &(GraphNodeIdx, GraphNodeIdx, EdgeType) {
		self.graph.edges.get(edge_idx.as_usize()).unwrap()
	}

	/// The number of edges in this graph
	#[inline]
	pub fn len_edges(&self) -> usize {
		self.graph.len_edges()
	}

	/// Iterate over all edges in this graph, including edge index
	#[inline]
	pub fn iter_edges_idx(
		&self,
	) -> impl Iterator<Item = (GraphEdgeIdx, &(GraphNodeIdx, GraphNodeIdx, EdgeType))> {
		self.graph
			.iter_edges()
			.enumerate()
			.map(|(a, b)| (GraphEdgeIdx(a), b))
	}

	/// Get all edges starting at the given node, in insertion order
	pub fn edges_starting_at(&self, node: GraphNodeIdx) -> &[GraphEdgeIdx] {
		self.edge_map_out.get(usize::from(node)).unwrap()
	}

	/// Get all edges ending at the given node, in insertion order
	pub fn edges_ending_at(&self, node: GraphNodeIdx) -> &[GraphEdgeIdx] {
		self.edge_map_in.get(usize::from(node)).unwrap()
	}

	/// How many edges end at the given node?
	#[inline]
	pub fn in_degree(&self, node: GraphNodeIdx) -> usize {
		self.edges_ending_at(node).len()
	}

	/// How many edges start at the given node?
	#[inline]
	pub fn out_degree(&self, node: GraphNodeIdx) -> usize {
		self.edges_starting_at(node).len()
	}

	/// Every edge of this graph exactly once, in an order that respects
	/// data dependencies: an edge leaving a node comes after every edge
	/// entering that node.
	///
	/// This is a topological order of the graph's line graph. Ties break
	/// deterministically by insertion order.
	pub fn topo_order_edges(&self) -> Vec<GraphEdgeIdx> {
		let mut indegree: Vec<usize> = (0..self.len_nodes())
			.map(|i| self.edge_map_in[i].len())
			.collect();

		let mut ready: VecDeque<usize> = (0..self.len_nodes())
			.filter(|&i| indegree[i] == 0)
			.collect();

		let mut order = Vec::with_capacity(self.len_edges());
		while let Some(node) = ready.pop_front() {
			for edge_idx in &self.edge_map_out[node] {
				order.push(*edge_idx);
				let (_, to, _) = self.get_edge(*edge_idx);
				let to = usize::from(*to);
				indegree[to] -= 1;
				if indegree[to] == 0 {
					ready.push_back(to);
				}
			}
		}

		// Finalized graphs are acyclic, so every edge was visited.
		debug_assert_eq!(order.len(), self.len_edges());
		order
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn edge_maps() {
		let mut g = Graph::new();
		let a = g.add_node("a");
		let b = g.add_node("b");
		let e0 = g.add_edge(a, b, 0);
		let e1 = g.add_edge(a, b, 1);
		let g = g.finalize();

		assert_eq!(g.edges_starting_at(a), &[e0, e1]);
		assert_eq!(g.edges_ending_at(b), &[e0, e1]);
		assert_eq!(g.out_degree(a), 2);
		assert_eq!(g.in_degree(a), 0);
	}

	#[test]
	fn topo_order_respects_dependencies() {
		// a -> b -> d, a -> c -> d
		let mut g = Graph::new();
		let a = g.add_node("a");
		let b = g.add_node("b");
		let c = g.add_node("c");
		let d = g.add_node("d");
		let ab = g.add_edge(a, b, ());
		let ac = g.add_edge(a, c, ());
		let bd = g.add_edge(b, d, ());
		let cd = g.add_edge(c, d, ());
		let g = g.finalize();

		let order = g.topo_order_edges();
		assert_eq!(order.len(), 4);

		let pos = |e: GraphEdgeIdx| order.iter().position(|x| *x == e).unwrap();
		assert!(pos(ab) < pos(bd));
		assert!(pos(ac) < pos(cd));
	}

	#[test]
	fn topo_order_is_deterministic_by_insertion() {
		// Two independent chains; the first-inserted chain's edges
		// always come out first at each level.
		let mut g = Graph::new();
		let a = g.add_node("a");
		let b = g.add_node("b");
		let x = g.add_node("x");
		let y = g.add_node("y");
		let ab = g.add_edge(a, b, ());
		let xy = g.add_edge(x, y, ());
		let g = g.finalize();

		assert_eq!(g.topo_order_edges(), vec![ab, xy]);
	}
}
