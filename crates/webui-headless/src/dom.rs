//! Script-side environment installed into every fresh context.

/// Global array `external.invoke` pushes into; drained after each turn.
pub(crate) const OUTBOX: &str = "__webui_outbox";

/// Global array of `[level, text]` pairs written by `console.*`.
pub(crate) const CONSOLE: &str = "__webui_console";

/// Global function that fills `head` and `body` from the parsed page.
pub(crate) const MOUNT: &str = "__webui_mount";

/// Minimal DOM: a node tree with `html`, `head` and `body`, element
/// creation, attribute access, tag lookup and `textContent`.
pub(crate) const DOM_SHIM: &str = r#"(function(g){
g.window=g;g.self=g;
function Node(type,name){this.nodeType=type;this.nodeName=name;this.childNodes=[];this.parentNode=null;}
Node.prototype.appendChild=function(c){if(c.parentNode){c.parentNode.removeChild(c);}c.parentNode=this;this.childNodes.push(c);return c;};
Node.prototype.removeChild=function(c){var i=this.childNodes.indexOf(c);if(i>=0){this.childNodes.splice(i,1);c.parentNode=null;}return c;};
Object.defineProperty(Node.prototype,'textContent',{
get:function(){if(this.nodeType===3){return this.data;}var s='';for(var i=0;i<this.childNodes.length;i++){s+=this.childNodes[i].textContent;}return s;},
set:function(v){if(this.nodeType===3){this.data=String(v);return;}this.childNodes=[];if(v!==null&&v!==undefined&&v!==''){this.appendChild(new Text(String(v)));}}});
Object.defineProperty(Node.prototype,'children',{get:function(){return this.childNodes.filter(function(n){return n.nodeType===1;});}});
Object.defineProperty(Node.prototype,'firstChild',{get:function(){return this.childNodes.length?this.childNodes[0]:null;}});
function Text(data){Node.call(this,3,'#text');this.data=data;}
Text.prototype=Object.create(Node.prototype);
function Element(tag){Node.call(this,1,String(tag).toUpperCase());this.tagName=this.nodeName;this.attributes={};this.style={};this.id='';}
Element.prototype=Object.create(Node.prototype);
Element.prototype.setAttribute=function(k,v){k=String(k);this.attributes[k]=String(v);if(k==='id'){this.id=String(v);}};
Element.prototype.getAttribute=function(k){return Object.prototype.hasOwnProperty.call(this.attributes,k)?this.attributes[k]:null;};
Element.prototype.getElementsByTagName=function(tag){var want=String(tag).toUpperCase(),out=[];
(function walk(n){for(var i=0;i<n.childNodes.length;i++){var c=n.childNodes[i];if(c.nodeType===1){if(want==='*'||c.tagName===want){out.push(c);}walk(c);}}})(this);return out;};
var html=new Element('html'),head=new Element('head'),body=new Element('body');
html.appendChild(head);html.appendChild(body);
g.document={documentElement:html,head:head,body:body,title:'',
createElement:function(t){return new Element(t);},
createTextNode:function(d){return new Text(String(d));},
getElementsByTagName:function(t){var want=String(t).toUpperCase();return (want==='HTML'||want==='*'?[html]:[]).concat(html.getElementsByTagName(t));},
getElementById:function(id){var all=html.getElementsByTagName('*');for(var i=0;i<all.length;i++){if(all[i].id===id){return all[i];}}return null;}};
function build(n){if(typeof n==='string'){return new Text(n);}var e=new Element(n.tag);
for(var i=0;i<n.attrs.length;i++){e.setAttribute(n.attrs[i][0],n.attrs[i][1]);}
for(var j=0;j<n.children.length;j++){e.appendChild(build(n.children[j]));}return e;}
function fill(target,n){for(var i=0;i<n.attrs.length;i++){target.setAttribute(n.attrs[i][0],n.attrs[i][1]);}
for(var j=0;j<n.children.length;j++){target.appendChild(build(n.children[j]));}}
g.__webui_mount=function(tree){fill(head,tree.head);fill(body,tree.body);};
g.__webui_outbox=[];g.__webui_console=[];
function forward(level){return function(){g.__webui_console.push([level,Array.prototype.map.call(arguments,String).join(' ')]);};}
g.console={log:forward('log'),info:forward('info'),warn:forward('warn'),error:forward('error'),debug:forward('debug')};
})(globalThis);"#;

/// Script returning (and clearing) the outbox as a JSON array of strings.
pub(crate) fn drain_outbox_script() -> String {
    format!("JSON.stringify({OUTBOX}.splice(0))")
}

pub(crate) fn drain_console_script() -> String {
    format!("JSON.stringify({CONSOLE}.splice(0))")
}
