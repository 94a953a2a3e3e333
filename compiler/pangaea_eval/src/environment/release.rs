//! Breaking frame/func cycles when a call returns.
//!
//! Trial deletion over the values a finished frame reaches: each node's
//! strong count is compared with the references found inside the subgraph.
//! A node with more handles than that is held from outside (another frame,
//! a native closure, the Rust stack) and is live, and so is everything it
//! reaches. Frames left unreached by any live node are garbage; clearing
//! their bindings cuts every cycle through them.
//!
//! Frames enclosing the released one are never entered. Anything they hold
//! shows up as an outside handle, which only ever keeps more alive.

use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};

use super::Env;
use crate::value::{FuncValue, MapValue, ObjValue, RangeValue, Value};

/// Values looked at before giving up and keeping everything.
const WORK_LIMIT: usize = 1 << 16;

/// A shared allocation that can take part in a cycle.
enum Node {
    Frame(Env),
    Func(Rc<FuncValue>),
    Arr(Rc<[Value]>),
    Obj(Rc<ObjValue>),
    Map(Rc<MapValue>),
    Range(Rc<RangeValue>),
}

impl Node {
    fn of(value: &Value) -> Option<Node> {
        match value {
            Value::Func(f) => Some(Node::Func(Rc::clone(f))),
            Value::Arr(a) => Some(Node::Arr(Rc::clone(a))),
            Value::Obj(o) => Some(Node::Obj(Rc::clone(o))),
            Value::Map(m) => Some(Node::Map(Rc::clone(m))),
            Value::Range(r) => Some(Node::Range(Rc::clone(r))),
            _ => None,
        }
    }

    fn addr(&self) -> usize {
        match self {
            Node::Frame(env) => env.0.addr(),
            Node::Func(f) => Rc::as_ptr(f).cast::<()>() as usize,
            Node::Arr(a) => Rc::as_ptr(a).cast::<()>() as usize,
            Node::Obj(o) => Rc::as_ptr(o).cast::<()>() as usize,
            Node::Map(m) => Rc::as_ptr(m).cast::<()>() as usize,
            Node::Range(r) => Rc::as_ptr(r).cast::<()>() as usize,
        }
    }

    fn strong_count(&self) -> usize {
        match self {
            Node::Frame(env) => env.0.strong_count(),
            Node::Func(f) => Rc::strong_count(f),
            Node::Arr(a) => Rc::strong_count(a),
            Node::Obj(o) => Rc::strong_count(o),
            Node::Map(m) => Rc::strong_count(m),
            Node::Range(r) => Rc::strong_count(r),
        }
    }
}

/// Every strong reference `node` holds to another node, one entry per handle.
fn children(node: &Node, outside: &FxHashSet<usize>) -> Vec<Node> {
    let mut out = Vec::new();
    match node {
        Node::Frame(env) => {
            let scope = env.0.borrow();
            out.extend(scope.bindings.values().filter_map(Node::of));
            if let Some(outer) = &scope.outer {
                if !outside.contains(&outer.0.addr()) {
                    out.push(Node::Frame(outer.clone()));
                }
            }
        }
        Node::Func(f) => {
            let env = f.env_ref();
            if !outside.contains(&env.0.addr()) {
                out.push(Node::Frame(env.clone()));
            }
            obj_children(&f.kwargs, &mut out);
        }
        Node::Arr(elems) => out.extend(elems.iter().filter_map(Node::of)),
        Node::Obj(obj) => obj_children(obj, &mut out),
        Node::Map(map) => {
            for (k, v) in map.iter() {
                out.extend(Node::of(k));
                out.extend(Node::of(v));
            }
        }
        Node::Range(r) => {
            out.extend([&r.start, &r.stop, &r.step].into_iter().filter_map(Node::of));
        }
    }
    out
}

fn obj_children(obj: &ObjValue, out: &mut Vec<Node>) {
    out.extend(obj.all_pairs().filter_map(|(_, v)| Node::of(v)));
    out.extend(obj.proto().and_then(Node::of));
}

/// The subgraph reachable from a released frame.
struct Graph {
    /// Each node is held exactly once here.
    nodes: Vec<Node>,
    index: FxHashMap<usize, usize>,
    edges: Vec<Vec<usize>>,
}

impl Graph {
    /// Discover everything `root` reaches, or `None` past the work limit.
    fn build(root: Env) -> Option<Graph> {
        let mut outside = FxHashSet::default();
        let mut outer = root.outer();
        while let Some(env) = outer {
            outside.insert(env.0.addr());
            outer = env.outer();
        }

        let mut graph = Graph {
            nodes: Vec::new(),
            index: FxHashMap::default(),
            edges: Vec::new(),
        };
        graph.intern(Node::Frame(root));
        let mut work = 0;
        let mut next = 0;
        while next < graph.nodes.len() {
            let found = children(&graph.nodes[next], &outside);
            work += found.len() + 1;
            if work > WORK_LIMIT {
                return None;
            }
            let targets = found.into_iter().map(|node| graph.intern(node)).collect();
            graph.edges[next] = targets;
            next += 1;
        }
        Some(graph)
    }

    /// Index of `node`, adding it on first sight. A repeated handle is
    /// dropped so each node stays held once.
    fn intern(&mut self, node: Node) -> usize {
        let addr = node.addr();
        if let Some(&i) = self.index.get(&addr) {
            return i;
        }
        let i = self.nodes.len();
        self.nodes.push(node);
        self.edges.push(Vec::new());
        self.index.insert(addr, i);
        i
    }

    /// Which nodes something outside the graph can still reach.
    fn live(&self) -> Vec<bool> {
        let mut inside = vec![0usize; self.nodes.len()];
        for &target in self.edges.iter().flatten() {
            inside[target] += 1;
        }

        let mut live = vec![false; self.nodes.len()];
        let mut stack = Vec::new();
        for (i, node) in self.nodes.iter().enumerate() {
            // one handle is the graph's own
            if node.strong_count() > inside[i] + 1 {
                live[i] = true;
                stack.push(i);
            }
        }
        while let Some(i) = stack.pop() {
            for &target in &self.edges[i] {
                if !live[target] {
                    live[target] = true;
                    stack.push(target);
                }
            }
        }
        live
    }
}

/// Clear every unreachable frame in the subgraph of `root`.
pub(super) fn break_cycles(root: Env) {
    let Some(graph) = Graph::build(root) else {
        tracing::trace!("frame graph too large, keeping it");
        return;
    };
    let live = graph.live();
    if live[0] {
        return;
    }
    let mut cleared = 0usize;
    for (node, live) in graph.nodes.iter().zip(live) {
        if let (Node::Frame(env), false) = (node, live) {
            env.clear_bindings();
            cleared += 1;
        }
    }
    tracing::trace!(cleared, "released frame cycle");
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};

    use pangaea_ir::{FuncComponent, Name, Source};

    use super::*;
    use crate::environment::{LocalScope, Scope};
    use crate::value::FuncKind;

    fn n(s: &str) -> Name {
        Name::intern(s)
    }

    /// A func over a fresh frame inside `env`, the way literals capture.
    fn func_in(env: &Env) -> Rc<FuncValue> {
        let component = FuncComponent {
            params: vec![n("x")],
            kwargs: Vec::new(),
            body: Rc::from(Vec::new()),
            src: Source::dummy(),
        };
        Rc::new(FuncValue::new(
            Rc::new(component),
            ObjValue::default(),
            FuncKind::Func,
            Env::new_enclosed(env),
        ))
    }

    fn watch(env: &Env) -> Weak<RefCell<Scope>> {
        Rc::downgrade(&env.0 .0)
    }

    #[test]
    fn test_self_bound_func_frame_is_freed() {
        let global = Env::new();
        let frame = Env::new_enclosed(&global);
        let g = func_in(&frame);
        frame.set(n("g"), Value::Func(g));
        let watched = watch(&frame);

        frame.release();
        assert!(watched.upgrade().is_none());
    }

    #[test]
    fn test_escaping_func_keeps_frame() {
        let global = Env::new();
        let frame = Env::new_enclosed(&global);
        frame.set(n("n"), Value::Int(2));
        let g = func_in(&frame);
        frame.set(n("g"), Value::Func(Rc::clone(&g)));

        frame.release();
        let captured = g.env_ref().outer();
        assert_eq!(captured.and_then(|f| f.get(n("n"))), Some(Value::Int(2)));
    }

    #[test]
    fn test_frame_bound_in_enclosing_scope_is_kept() {
        let global = Env::new();
        let frame = Env::new_enclosed(&global);
        let g = func_in(&frame);
        frame.set(n("g"), Value::Func(Rc::clone(&g)));
        global.set(n("kept"), Value::arr(vec![Value::Func(g)]));
        let watched = watch(&frame);

        frame.release();
        let frame = watched.upgrade().map(|scope| Env(LocalScope(scope)));
        assert!(frame.is_some_and(|f| f.get(n("g")).is_some()));
    }

    #[test]
    fn test_plain_frame_is_left_alone() {
        let frame = Env::new();
        frame.set(n("a"), Value::Int(1));
        let alias = frame.clone();
        frame.release();
        assert_eq!(alias.get(n("a")), Some(Value::Int(1)));
    }
}
